//! # Tintwheel - theme previews from the command line
//!
//! The `tintwheel` binary runs the theme core against an in-memory page and
//! prints what happened. It is meant for checking presets and contrast
//! choices without loading a browser.
//!
//! ```text
//! tintwheel contrast "#767676" "#ffffff"
//! tintwheel pick "#0f1113"
//! tintwheel presets
//! tintwheel apply --preset "Warm Tint" --invert-media
//! tintwheel apply --url https://example.com --settings settings.yaml --format yaml
//! tintwheel handle '{"action":"applyColorScheme","data":{"bg":"#fff"}}'
//! ```
//!
//! [`run`] returns the text to print so the commands can be tested without
//! capturing stdout.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tintwheel_color::{contrast_ratio, decode_hex, meets_threshold, pick_readable_text_color};
use tintwheel_theme::{
    domain_of, handle_message, ApplyReport, Command, DocumentSnapshot, MemoryDocument, Settings,
    Theme, ThemeApplier, ThemeDescriptor, ThemeError, ThemeMode,
};
use tracing::{debug, info};

pub mod logging;

/// Preview dark and tinted page themes.
#[derive(Debug, Parser)]
#[command(name = "tintwheel", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (YAML, or JSON with a .json extension)
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Output format for reports
    #[arg(long, value_enum, default_value_t = Format::Json, global = true)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Commands,
}

/// Report serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Contrast ratio between two colors
    Contrast {
        first: String,
        second: String,
    },
    /// Readable text color for a background
    Pick { background: String },
    /// List the global preset and named presets
    Presets,
    /// Apply a theme to an empty page and print the result
    Apply(ApplyArgs),
    /// Run a raw command record against an empty page
    Handle { json: String },
}

#[derive(Debug, Default, Args)]
pub struct ApplyArgs {
    /// Theme file to start from
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    pub theme: Option<PathBuf>,

    /// Named preset to start from
    #[arg(long)]
    pub preset: Option<String>,

    /// Page URL, used for per-site lookup and the block list
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub bg: Option<String>,

    #[arg(long)]
    pub text: Option<String>,

    #[arg(long)]
    pub accent: Option<String>,

    /// Overlay alpha in [0, 1]
    #[arg(long)]
    pub alpha: Option<f64>,

    #[arg(long)]
    pub invert_media: bool,

    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Stylesheet,
    Tint,
    Invert,
}

impl From<ModeArg> for ThemeMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Stylesheet => ThemeMode::Stylesheet,
            ModeArg::Tint => ThemeMode::Tint,
            ModeArg::Invert => ThemeMode::Invert,
        }
    }
}

/// What `apply` and `handle` print.
#[derive(Debug, Serialize)]
pub struct PreviewOutput {
    pub report: ApplyReport,
    pub document: DocumentSnapshot,
}

/// Runs a parsed command line and returns the text to print.
pub fn run(cli: &Cli) -> Result<String> {
    let settings = load_settings(cli.settings.as_deref())?;

    match &cli.command {
        Commands::Contrast { first, second } => contrast(&settings, first, second),
        Commands::Pick { background } => pick(background),
        Commands::Presets => Ok(presets(&settings)),
        Commands::Apply(args) => {
            let preview = apply(&settings, args)?;
            render(&preview, cli.format)
        }
        Commands::Handle { json } => {
            let doc = MemoryDocument::new();
            let mut applier = ThemeApplier::new();
            let report = handle_message(json, &mut applier, &doc);
            render(
                &PreviewOutput {
                    report,
                    document: doc.snapshot(),
                },
                cli.format,
            )
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => {
            let settings = Settings::from_file(path)
                .with_context(|| format!("loading settings from {}", path.display()))?;
            debug!(path = %path.display(), "loaded settings");
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}

fn contrast(settings: &Settings, first: &str, second: &str) -> Result<String> {
    let a = decode_hex(first)?;
    let b = decode_hex(second)?;
    let ratio = contrast_ratio(a, b);
    let threshold = settings.options.contrast_threshold;
    let verdict = if meets_threshold(ratio, threshold) {
        "meets"
    } else {
        "below"
    };
    Ok(format!(
        "{} on {}: {:.2}:1 ({} {}:1)\n",
        a, b, ratio, verdict, threshold
    ))
}

fn pick(background: &str) -> Result<String> {
    let bg = decode_hex(background)?;
    let readable = pick_readable_text_color(bg);
    Ok(format!(
        "{} on {}: {:.2}:1\n",
        readable.color.rgb(),
        bg,
        readable.ratio
    ))
}

fn presets(settings: &Settings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {}", "(global)", describe(&settings.global_preset));
    for (name, preset) in &settings.presets {
        let _ = writeln!(out, "{:<16} {}", name, describe(preset));
    }
    out
}

fn describe(preset: &ThemeDescriptor) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());
    let mode = preset.mode.unwrap_or_default();
    format!(
        "bg {}  text {}  accent {}  mode {}",
        field(&preset.bg),
        field(&preset.text),
        field(&preset.accent),
        mode_name(mode)
    )
}

fn mode_name(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Stylesheet => "stylesheet",
        ThemeMode::Tint => "tint",
        ThemeMode::Invert => "invert",
    }
}

/// Resolves the theme record for `args` and applies it to an empty page.
///
/// A `--url` on the block list wins over every other source.
pub fn apply(settings: &Settings, args: &ApplyArgs) -> Result<PreviewOutput> {
    let doc = MemoryDocument::new();

    let blocked = args
        .url
        .as_deref()
        .and_then(domain_of)
        .filter(|domain| settings.is_blocked(domain));
    if let Some(domain) = blocked {
        info!(%domain, "site is blocked, nothing applied");
        return Ok(PreviewOutput {
            report: ApplyReport::error(format!("{} is blocked", domain)),
            document: doc.snapshot(),
        });
    }

    let mut descriptor = base_descriptor(settings, args)?;
    if let Some(bg) = &args.bg {
        descriptor.bg = Some(bg.clone());
    }
    if let Some(text) = &args.text {
        descriptor.text = Some(text.clone());
    }
    if let Some(accent) = &args.accent {
        descriptor.accent = Some(accent.clone());
    }
    if let Some(alpha) = args.alpha {
        descriptor.overlay_alpha = Some(alpha);
    }
    if args.invert_media {
        descriptor.invert_media = Some(true);
    }
    if let Some(mode) = args.mode {
        descriptor.mode = Some(mode.into());
    }

    let mut applier = ThemeApplier::new();
    let report = Command::ApplyColorScheme { data: descriptor }.execute(&mut applier, &doc);
    Ok(PreviewOutput {
        report,
        document: doc.snapshot(),
    })
}

/// Starting record: theme file, then preset, then per-site lookup.
fn base_descriptor(settings: &Settings, args: &ApplyArgs) -> Result<ThemeDescriptor> {
    if let Some(path) = &args.theme {
        let theme = Theme::from_file(path)?;
        return Ok(theme.to_descriptor());
    }
    if let Some(name) = &args.preset {
        return match settings.presets.get(name) {
            Some(preset) => Ok(preset.clone()),
            None => Err(ThemeError::UnknownPreset(name.clone()).into()),
        };
    }
    let site = args
        .url
        .as_deref()
        .and_then(|url| settings.theme_for_url(url));
    Ok(site.unwrap_or(&settings.global_preset).clone())
}

fn render<T: Serialize>(value: &T, format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let mut out = serde_json::to_string_pretty(value)?;
            out.push('\n');
            Ok(out)
        }
        Format::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}
