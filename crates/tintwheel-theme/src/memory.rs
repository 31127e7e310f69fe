//! In-memory [`Document`] for tests and previews.
//!
//! [`MemoryDocument`] keeps just enough page state to observe what the
//! applier did: root variables, attributes and classes, and a list of
//! inserted elements. It also lets a test play the part of the page:
//!
//! - [`append_content`](MemoryDocument::append_content) reports added nodes to
//!   listeners, like a single-page app swapping in a new view
//! - [`page_remove_element`](MemoryDocument::page_remove_element) and
//!   [`page_remove_class`](MemoryDocument::page_remove_class) undo the
//!   applier's work without notifying anyone
//! - [`restricted`](MemoryDocument::restricted) refuses every call, like a
//!   browser-internal page
//!
//! Elements are stored in a list rather than a map, so a second insertion
//! under the same id shows up as a duplicate.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::document::{Document, MutationBatch, MutationListener, Subscription};
use crate::error::DocumentError;

/// What kind of element an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Stylesheet,
    Overlay,
}

/// One element as seen in a [`DocumentSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSnapshot {
    pub id: String,
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

/// Observable state of a [`MemoryDocument`] at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DocumentSnapshot {
    /// Root custom properties.
    pub variables: BTreeMap<String, String>,
    /// Root attributes.
    pub attributes: BTreeMap<String, String>,
    /// Root classes.
    pub classes: BTreeSet<String>,
    /// Inserted elements, in insertion order.
    pub elements: Vec<ElementSnapshot>,
    /// Number of registered structural listeners.
    pub observers: usize,
}

#[derive(Default)]
struct PageState {
    restricted: Option<String>,
    variables: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    elements: Vec<ElementSnapshot>,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, MutationListener)>,
}

/// A [`Document`] backed by plain collections.
///
/// Clones share the same page.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    page: Rc<RefCell<PageState>>,
    listeners: Rc<RefCell<Listeners>>,
}

impl MemoryDocument {
    /// Creates an empty, writable document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document that refuses every operation.
    pub fn restricted(reason: impl Into<String>) -> Self {
        let doc = Self::new();
        doc.set_restricted(Some(reason.into()));
        doc
    }

    /// Restricts or un-restricts the document.
    pub fn set_restricted(&self, reason: Option<String>) {
        self.page.borrow_mut().restricted = reason;
    }

    fn writable(&self) -> Result<std::cell::RefMut<'_, PageState>, DocumentError> {
        let page = self.page.borrow_mut();
        if let Some(reason) = page.restricted.clone() {
            return Err(DocumentError::unavailable(reason));
        }
        Ok(page)
    }

    // === Page simulation ===

    /// Reports `count` added nodes to every listener.
    pub fn append_content(&self, count: usize) {
        self.notify(MutationBatch::added(count));
    }

    /// Delivers a batch to every listener registered at the time of the call.
    pub fn notify(&self, batch: MutationBatch) {
        let listeners: Vec<MutationListener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&batch);
        }
    }

    /// Removes every element with `id`, as a page script would, without
    /// notifying listeners. Returns how many were removed.
    pub fn page_remove_element(&self, id: &str) -> usize {
        let mut page = self.page.borrow_mut();
        let before = page.elements.len();
        page.elements.retain(|el| el.id != id);
        before - page.elements.len()
    }

    /// Removes a root class without notifying listeners.
    pub fn page_remove_class(&self, class: &str) -> bool {
        self.page.borrow_mut().classes.remove(class)
    }

    // === Inspection ===

    /// Value of a root custom property.
    pub fn variable(&self, name: &str) -> Option<String> {
        self.page.borrow().variables.get(name).cloned()
    }

    /// Value of a root attribute.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.page.borrow().attributes.get(name).cloned()
    }

    /// Whether the root carries a class.
    pub fn has_class(&self, class: &str) -> bool {
        self.page.borrow().classes.contains(class)
    }

    /// Number of elements with this id (more than one means a duplicate).
    pub fn element_count(&self, id: &str) -> usize {
        self.page
            .borrow()
            .elements
            .iter()
            .filter(|el| el.id == id)
            .count()
    }

    /// Fill of the first element with this id.
    pub fn fill(&self, id: &str) -> Option<String> {
        self.page
            .borrow()
            .elements
            .iter()
            .find(|el| el.id == id)
            .and_then(|el| el.fill.clone())
    }

    /// Number of registered structural listeners.
    pub fn observer_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// Captures the current page state.
    pub fn snapshot(&self) -> DocumentSnapshot {
        let page = self.page.borrow();
        DocumentSnapshot {
            variables: page.variables.clone(),
            attributes: page.attributes.clone(),
            classes: page.classes.clone(),
            elements: page.elements.clone(),
            observers: self.observer_count(),
        }
    }

    fn insert(&self, id: &str, kind: ElementKind, href: Option<&str>) -> Result<(), DocumentError> {
        self.writable()?.elements.push(ElementSnapshot {
            id: id.to_string(),
            kind,
            href: href.map(str::to_string),
            fill: None,
        });
        Ok(())
    }
}

impl Document for MemoryDocument {
    fn page_id(&self) -> usize {
        Rc::as_ptr(&self.page) as usize
    }

    fn contains(&self, id: &str) -> Result<bool, DocumentError> {
        Ok(self.writable()?.elements.iter().any(|el| el.id == id))
    }

    fn insert_stylesheet(&self, id: &str, href: &str) -> Result<(), DocumentError> {
        self.insert(id, ElementKind::Stylesheet, Some(href))
    }

    fn insert_overlay(&self, id: &str) -> Result<(), DocumentError> {
        self.insert(id, ElementKind::Overlay, None)
    }

    fn set_fill(&self, id: &str, css_color: &str) -> Result<(), DocumentError> {
        let mut page = self.writable()?;
        if let Some(el) = page.elements.iter_mut().find(|el| el.id == id) {
            el.fill = Some(css_color.to_string());
        }
        Ok(())
    }

    fn remove_element(&self, id: &str) -> Result<bool, DocumentError> {
        let mut page = self.writable()?;
        match page.elements.iter().position(|el| el.id == id) {
            Some(index) => {
                page.elements.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn set_root_variable(&self, name: &str, value: &str) -> Result<(), DocumentError> {
        self.writable()?
            .variables
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_root_variable(&self, name: &str) -> Result<(), DocumentError> {
        self.writable()?.variables.remove(name);
        Ok(())
    }

    fn set_root_attribute(&self, name: &str, value: &str) -> Result<(), DocumentError> {
        self.writable()?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_root_attribute(&self, name: &str) -> Result<(), DocumentError> {
        self.writable()?.attributes.remove(name);
        Ok(())
    }

    fn add_root_class(&self, class: &str) -> Result<(), DocumentError> {
        self.writable()?.classes.insert(class.to_string());
        Ok(())
    }

    fn remove_root_class(&self, class: &str) -> Result<(), DocumentError> {
        self.writable()?.classes.remove(class);
        Ok(())
    }

    fn observe_structure(&self, listener: MutationListener) -> Result<Subscription, DocumentError> {
        drop(self.writable()?);

        let id = {
            let mut listeners = self.listeners.borrow_mut();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, listener));
            id
        };

        let listeners = Rc::downgrade(&self.listeners);
        Ok(Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners
                    .borrow_mut()
                    .entries
                    .retain(|(entry, _)| *entry != id);
            }
        }))
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("restricted", &self.page.borrow().restricted)
            .field("elements", &self.page.borrow().elements.len())
            .field("observers", &self.observer_count())
            .finish()
    }
}
