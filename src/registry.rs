// ── Window → application back-references ──────────────────────────────────────
//
// The window procedure is a free function; it finds the application instance
// that owns a window through this registry.  Entries are weak: the registry
// never keeps an instance alive, and a dropped instance is never reached.

use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use crate::platform::WindowId;

pub(crate) struct WindowRegistry<T> {
    entries: HashMap<WindowId, Weak<RefCell<T>>>,
}

impl<T> WindowRegistry<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Record `owner` as the instance behind `window`.
    pub(crate) fn insert(&mut self, window: WindowId, owner: &Rc<RefCell<T>>) {
        self.entries.insert(window, Rc::downgrade(owner));
    }

    /// The live instance behind `window`, if any.  Entries whose owner has
    /// been dropped are pruned.
    pub(crate) fn lookup(&mut self, window: WindowId) -> Option<Rc<RefCell<T>>> {
        let owner = self.entries.get(&window)?.upgrade();
        if owner.is_none() {
            self.entries.remove(&window);
        }
        owner
    }

    pub(crate) fn remove(&mut self, window: WindowId) {
        self.entries.remove(&window);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T> Default for WindowRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
