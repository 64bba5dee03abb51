use shared::ObjectId;

/// Object selection state (supports multi-select)
#[derive(Default)]
pub struct SelectionState {
    /// Selected object IDs (in order of selection)
    selected: Vec<ObjectId>,
    /// Selection is disabled while a zone is being drawn
    locked: bool,
    /// Version counter for selection changes
    version: u64,
}

impl SelectionState {
    /// Primary (first) selected object
    pub fn primary(&self) -> Option<&ObjectId> {
        self.selected.first()
    }

    /// All selected objects
    pub fn all(&self) -> &[ObjectId] {
        &self.selected
    }

    /// The object contextual actions apply to: only set for a single selection
    pub fn contextual(&self) -> Option<&ObjectId> {
        match self.selected.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Check if an object is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// More than one object selected
    pub fn is_multi(&self) -> bool {
        self.selected.len() > 1
    }

    /// Select a single object (clears previous selection)
    pub fn select(&mut self, id: ObjectId) {
        if self.locked {
            return;
        }
        self.selected.clear();
        self.selected.push(id);
        self.version += 1;
    }

    /// Replace the selection with several objects
    pub fn select_many(&mut self, ids: Vec<ObjectId>) {
        if self.locked {
            return;
        }
        self.selected.clear();
        for id in ids {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
        self.version += 1;
    }

    /// Toggle selection (Ctrl+click behavior)
    pub fn toggle(&mut self, id: ObjectId) {
        if self.locked {
            return;
        }
        if let Some(pos) = self.selected.iter().position(|s| s == &id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
        self.version += 1;
    }

    /// Clear all selection
    pub fn clear(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.version += 1;
        }
    }

    /// Drop an object that no longer exists
    pub fn forget(&mut self, id: &str) {
        let before = self.selected.len();
        self.selected.retain(|s| s != id);
        if self.selected.len() != before {
            self.version += 1;
        }
    }

    /// Number of selected objects
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// Disable selection and drop whatever was selected
    pub fn lock(&mut self) {
        self.clear();
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_empty() {
        let s = SelectionState::default();
        assert!(s.primary().is_none());
        assert!(s.all().is_empty());
        assert_eq!(s.count(), 0);
        assert!(!s.is_locked());
    }

    #[test]
    fn test_select_single() {
        let mut s = SelectionState::default();
        s.select("a".to_string());
        assert_eq!(s.primary(), Some(&"a".to_string()));
        assert_eq!(s.contextual(), Some(&"a".to_string()));
        assert!(s.is_selected("a"));
    }

    #[test]
    fn test_select_clears_previous() {
        let mut s = SelectionState::default();
        s.select("a".to_string());
        s.select("b".to_string());
        assert_eq!(s.count(), 1);
        assert!(!s.is_selected("a"));
        assert!(s.is_selected("b"));
    }

    #[test]
    fn test_toggle_builds_multi_selection() {
        let mut s = SelectionState::default();
        s.select("a".to_string());
        s.toggle("b".to_string());
        assert!(s.is_multi());
        assert!(s.contextual().is_none());
        s.toggle("a".to_string());
        assert!(!s.is_multi());
        assert_eq!(s.contextual(), Some(&"b".to_string()));
    }

    #[test]
    fn test_select_many_dedups() {
        let mut s = SelectionState::default();
        s.select_many(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(s.all(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_forget_removes_dangling_id() {
        let mut s = SelectionState::default();
        s.select_many(vec!["a".into(), "b".into()]);
        s.forget("a");
        assert_eq!(s.all(), &["b".to_string()]);
    }

    #[test]
    fn test_lock_blocks_selection() {
        let mut s = SelectionState::default();
        s.select("a".to_string());
        s.lock();
        assert_eq!(s.count(), 0);
        s.select("b".to_string());
        s.toggle("c".to_string());
        assert_eq!(s.count(), 0);
        s.unlock();
        s.select("b".to_string());
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn test_version_bumps_on_change() {
        let mut s = SelectionState::default();
        let v0 = s.version();
        s.select("a".to_string());
        assert!(s.version() > v0);
        let v1 = s.version();
        s.forget("zzz");
        assert_eq!(s.version(), v1);
    }
}
