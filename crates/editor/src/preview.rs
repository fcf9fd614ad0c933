//! Local preview handles for image bytes.
//!
//! Handles look like `blob:<uuid>` and stay valid until revoked. The store
//! belongs to one editor; handles are revoked when their slot is removed or
//! the form is discarded.

use std::collections::HashMap;
use std::sync::Arc;

use stationdesk_core::images::PreviewHandle;

#[derive(Debug, Default)]
pub struct PreviewStore {
    entries: HashMap<PreviewHandle, Arc<Vec<u8>>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` and return a fresh handle for them.
    pub fn create(&mut self, bytes: Vec<u8>) -> PreviewHandle {
        let handle = PreviewHandle::new(format!("blob:{}", uuid::Uuid::new_v4()));
        self.entries.insert(handle.clone(), Arc::new(bytes));
        handle
    }

    /// Bytes behind `handle`, if it has not been revoked.
    pub fn resolve(&self, handle: &PreviewHandle) -> Option<Arc<Vec<u8>>> {
        self.entries.get(handle).cloned()
    }

    /// Release `handle`. Returns `false` if it was unknown.
    pub fn revoke(&mut self, handle: &PreviewHandle) -> bool {
        self.entries.remove(handle).is_some()
    }

    pub fn revoke_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_resolve_revoke() {
        let mut store = PreviewStore::new();
        let handle = store.create(vec![1, 2, 3]);

        assert!(handle.as_str().starts_with("blob:"));
        assert_eq!(store.resolve(&handle).as_deref(), Some(&vec![1, 2, 3]));

        assert!(store.revoke(&handle));
        assert!(store.resolve(&handle).is_none());
        assert!(!store.revoke(&handle));
    }

    #[test]
    fn handles_are_unique() {
        let mut store = PreviewStore::new();
        let a = store.create(vec![0]);
        let b = store.create(vec![0]);
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);

        store.revoke_all();
        assert!(store.is_empty());
    }
}
