//! The document abstraction the applier writes to.
//!
//! [`ThemeApplier`](crate::ThemeApplier) never touches a DOM directly. It
//! talks to a [`Document`]: a handle that can attach and remove a few named
//! things on a page and report structural changes. A browser binding
//! implements it over the live DOM; [`MemoryDocument`](crate::MemoryDocument)
//! implements it in memory for tests and previews.
//!
//! Handles are expected to be cheap to clone and to share the underlying page,
//! like DOM element handles do. All methods therefore take `&self`.
//!
//! # Observation
//!
//! [`Document::observe_structure`] registers a listener and returns a
//! [`Subscription`]. Cancelling or dropping the subscription unregisters the
//! listener synchronously; once it returns, the listener is never called
//! again.

use std::fmt;
use std::rc::Rc;

use crate::error::DocumentError;

/// A batch of structural changes reported by a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationBatch {
    /// Nodes inserted anywhere under the root.
    pub added_nodes: usize,
    /// Nodes removed anywhere under the root.
    pub removed_nodes: usize,
}

impl MutationBatch {
    /// A batch that only adds nodes.
    pub fn added(count: usize) -> Self {
        Self {
            added_nodes: count,
            removed_nodes: 0,
        }
    }

    /// A batch that only removes nodes.
    pub fn removed(count: usize) -> Self {
        Self {
            added_nodes: 0,
            removed_nodes: count,
        }
    }

    /// True when the batch inserted content.
    pub fn has_additions(&self) -> bool {
        self.added_nodes > 0
    }
}

/// Callback invoked for each structural change batch.
pub type MutationListener = Rc<dyn Fn(&MutationBatch)>;

/// Cancellation token for a structural-change listener.
///
/// Dropping the token cancels it.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps the function that unregisters the listener.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unregisters the listener now.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// A page the applier can theme.
///
/// Element operations address singleton elements by id. Root operations
/// target the document's root element (`<html>` in a browser). Every method
/// may fail with [`DocumentError::Unavailable`] when the page cannot be
/// touched.
pub trait Document {
    /// Identity of the underlying page. Handles sharing a page return the
    /// same id; handles to different live pages never do.
    fn page_id(&self) -> usize;

    /// Whether an element with this id exists.
    fn contains(&self, id: &str) -> Result<bool, DocumentError>;

    /// Appends a stylesheet link with the given id and href.
    fn insert_stylesheet(&self, id: &str, href: &str) -> Result<(), DocumentError>;

    /// Appends an overlay layer element with the given id.
    fn insert_overlay(&self, id: &str) -> Result<(), DocumentError>;

    /// Sets the fill color of an element. Missing elements are ignored.
    fn set_fill(&self, id: &str, css_color: &str) -> Result<(), DocumentError>;

    /// Removes an element by id. Returns whether one was removed.
    fn remove_element(&self, id: &str) -> Result<bool, DocumentError>;

    /// Sets a custom property on the root style.
    fn set_root_variable(&self, name: &str, value: &str) -> Result<(), DocumentError>;

    /// Removes a custom property from the root style.
    fn remove_root_variable(&self, name: &str) -> Result<(), DocumentError>;

    /// Sets an attribute on the root element.
    fn set_root_attribute(&self, name: &str, value: &str) -> Result<(), DocumentError>;

    /// Removes an attribute from the root element.
    fn remove_root_attribute(&self, name: &str) -> Result<(), DocumentError>;

    /// Adds a class to the root element.
    fn add_root_class(&self, class: &str) -> Result<(), DocumentError>;

    /// Removes a class from the root element.
    fn remove_root_class(&self, class: &str) -> Result<(), DocumentError>;

    /// Registers a listener for structural changes under the root.
    fn observe_structure(&self, listener: MutationListener) -> Result<Subscription, DocumentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_batch_additions() {
        assert!(MutationBatch::added(2).has_additions());
        assert!(!MutationBatch::removed(2).has_additions());
        assert!(!MutationBatch::default().has_additions());
    }

    #[test]
    fn test_subscription_cancel_runs_once() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let sub = Subscription::new(move || counter.set(counter.get() + 1));
        sub.cancel();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_subscription_drop_cancels() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        {
            let _sub = Subscription::new(move || counter.set(counter.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_subscription_debug() {
        let sub = Subscription::new(|| {});
        assert_eq!(format!("{:?}", sub), "Subscription { active: true }");
    }
}
