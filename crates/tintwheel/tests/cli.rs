//! Command-line behavior, driven through `run` with parsed arguments.

use clap::Parser;
use tintwheel::{run, Cli};

fn run_args(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("tintwheel").chain(args.iter().copied()))?;
    run(&cli)
}

fn run_json(args: &[&str]) -> serde_json::Value {
    let out = run_args(args).unwrap();
    serde_json::from_str(&out).unwrap()
}

// =============================================================================
// Color commands
// =============================================================================

#[test]
fn contrast_reports_ratio_and_verdict() {
    let out = run_args(&["contrast", "#767676", "#fff"]).unwrap();
    assert_eq!(out, "#767676 on #ffffff: 4.54:1 (meets 4.5:1)\n");

    let out = run_args(&["contrast", "777", "ffffff"]).unwrap();
    assert!(out.contains("below 4.5:1"), "{}", out);
}

#[test]
fn contrast_rejects_bad_color() {
    let err = run_args(&["contrast", "#12", "#fff"]).unwrap_err();
    assert!(err.to_string().contains("#12"));
}

#[test]
fn pick_chooses_text_color() {
    assert_eq!(run_args(&["pick", "#000"]).unwrap(), "#ffffff on #000000: 21.00:1\n");
    assert_eq!(run_args(&["pick", "#ffffff"]).unwrap(), "#000000 on #ffffff: 21.00:1\n");
}

#[test]
fn presets_lists_defaults() {
    let out = run_args(&["presets"]).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("(global)"));
    assert!(lines[1].starts_with("Dark Neutral"));
    assert!(lines[2].contains("accent #f08c00"));
    assert!(lines[2].contains("mode tint"));
}

// =============================================================================
// apply
// =============================================================================

#[test]
fn apply_global_preset() {
    let value = run_json(&["apply"]);
    assert_eq!(value["report"]["status"], "applied");
    // the stock global preset has explicit text, so no ratio
    assert!(value["report"].get("contrastRatio").is_none());
    assert_eq!(value["document"]["variables"]["--tw-accent"], "#82aaff");
    assert_eq!(value["document"]["observers"], 1);
}

#[test]
fn apply_overrides_and_derived_text() {
    let value = run_json(&[
        "apply",
        "--bg",
        "#ffffff",
        "--text",
        "",
        "--accent",
        "#f08c00",
        "--alpha",
        "0.3",
        "--invert-media",
    ]);
    assert_eq!(value["report"]["status"], "applied");
    assert!(value["report"]["contrastRatio"].as_f64().unwrap() > 20.9);
    assert_eq!(value["document"]["variables"]["--tw-text"], "#000000");
    assert_eq!(value["document"]["variables"]["--tw-overlay-alpha"], "0.3");
    assert_eq!(value["document"]["classes"][0], "tw-fix-media");
}

#[test]
fn apply_invalid_alpha_is_error_report() {
    let value = run_json(&["apply", "--alpha", "2"]);
    assert_eq!(value["report"]["status"], "error");
    assert!(value["document"]["variables"].as_object().unwrap().is_empty());
}

#[test]
fn apply_named_preset_yaml() {
    let out = run_args(&["apply", "--preset", "Warm Tint", "--format", "yaml"]).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
    assert_eq!(value["report"]["status"].as_str(), Some("applied"));
    assert_eq!(
        value["document"]["variables"]["--tw-bg"].as_str(),
        Some("#0b0a0a")
    );
}

#[test]
fn apply_unknown_preset_fails() {
    let err = run_args(&["apply", "--preset", "Nope"]).unwrap_err();
    assert!(err.to_string().contains("Nope"));
}

#[test]
fn apply_theme_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("night.yaml");
    std::fs::write(&path, "bg: \"#101010\"\naccent: \"#00ff00\"\nmode: invert\n").unwrap();

    let value = run_json(&["apply", "--theme", path.to_str().unwrap()]);
    assert_eq!(value["document"]["variables"]["--tw-bg"], "#101010");
    assert_eq!(value["document"]["variables"]["--tw-text"], "#ffffff");
}

#[test]
fn apply_uses_settings_file_for_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r##"{
            "perSite": {"example.com": {"bg": "#222222", "text": "#dddddd"}},
            "blockedSites": ["bank.example"]
        }"##,
    )
    .unwrap();
    let settings = path.to_str().unwrap();

    let value = run_json(&["--settings", settings, "apply", "--url", "https://example.com/x"]);
    assert_eq!(value["document"]["variables"]["--tw-bg"], "#222222");

    let value = run_json(&["apply", "--url", "https://bank.example/", "--settings", settings]);
    assert_eq!(value["report"]["status"], "error");
    assert_eq!(value["report"]["message"], "bank.example is blocked");
    assert!(value["document"]["elements"].as_array().unwrap().is_empty());
}

#[test]
fn blocked_url_wins_over_preset_and_theme_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.yaml");
    std::fs::write(&settings, "blockedSites: [Bank.Example]\n").unwrap();
    let theme = dir.path().join("night.yaml");
    std::fs::write(&theme, "bg: \"#101010\"\n").unwrap();
    let settings = settings.to_str().unwrap();

    for source in [["--preset", "Warm Tint"], ["--theme", theme.to_str().unwrap()]] {
        let mut args = vec!["--settings", settings, "apply", "--url", "https://bank.example/"];
        args.extend(source);
        let value = run_json(&args);
        assert_eq!(value["report"]["status"], "error");
        assert_eq!(value["report"]["message"], "bank.example is blocked");
        assert!(value["document"]["variables"].as_object().unwrap().is_empty());
    }
}

#[test]
fn missing_settings_file_fails() {
    let err = run_args(&["--settings", "/definitely/missing.yaml", "presets"]).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.yaml"));
}

// =============================================================================
// handle
// =============================================================================

#[test]
fn handle_apply_message() {
    let value = run_json(&[
        "handle",
        r##"{"action":"applyColorScheme","data":{"bg":"#000000"}}"##,
    ]);
    assert_eq!(value["report"]["status"], "applied");
    let ratio = value["report"]["contrastRatio"].as_f64().unwrap();
    assert!((ratio - 21.0).abs() < 1e-9);
}

#[test]
fn handle_disable_on_empty_page() {
    let value = run_json(&["handle", r#"{"action":"disableColorScheme"}"#]);
    assert_eq!(value["report"]["status"], "removed");
}

#[test]
fn handle_garbage_is_error_report() {
    let value = run_json(&["handle", "{"]);
    assert_eq!(value["report"]["status"], "error");
}

#[test]
fn verbose_flag_counts() {
    let cli = Cli::try_parse_from(["tintwheel", "-vv", "presets"]).unwrap();
    assert_eq!(cli.verbose, 2);
}
