//! Snapshot-based undo/redo. The editor pushes a full model snapshot after
//! every committed edit; undo walks back along the stack, redo replays it,
//! and any new edit clears the redo stack.

#[derive(Debug, Clone)]
pub struct UndoRedoManager<T: Clone> {
    undo_stack: Vec<T>,
    redo_stack: Vec<T>,
    initial_state: Option<T>,
}

impl<T: Clone> Default for UndoRedoManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> UndoRedoManager<T> {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            initial_state: None,
        }
    }

    /// Records the state reached after an edit and clears the redo stack.
    pub fn add_state(&mut self, state: &T) {
        self.undo_stack.push(state.clone());
        self.redo_stack.clear();
    }

    /// Steps back one state. The bottom of the stack is never popped, so the
    /// first recorded state always remains reachable.
    pub fn undo(&mut self) -> Option<T> {
        if self.undo_stack.len() > 1 {
            let current = self.undo_stack.pop()?;
            self.redo_stack.push(current);
            return self.undo_stack.last().cloned();
        }
        None
    }

    /// Replays the most recently undone state, if any.
    pub fn redo(&mut self) -> Option<T> {
        let state = self.redo_stack.pop()?;
        self.undo_stack.push(state);
        self.undo_stack.last().cloned()
    }

    pub fn set_initial_state(&mut self, state: &T) {
        self.initial_state = Some(state.clone());
    }

    /// Returns to the initial state, recording it as a regular edit so the
    /// reset itself can be undone.
    pub fn reset(&mut self) -> Option<T> {
        let initial = self.initial_state.clone()?;
        self.add_state(&initial);
        Some(initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_walks_back_and_keeps_first_state() {
        let mut manager = UndoRedoManager::new();
        manager.add_state(&1);
        manager.add_state(&2);
        manager.add_state(&3);

        assert_eq!(manager.undo(), Some(2));
        assert_eq!(manager.undo(), Some(1));
        assert_eq!(manager.undo(), None);
    }

    #[test]
    fn redo_replays_undone_states() {
        let mut manager = UndoRedoManager::new();
        manager.add_state(&1);
        manager.add_state(&2);

        assert_eq!(manager.undo(), Some(1));
        assert_eq!(manager.redo(), Some(2));
        assert_eq!(manager.redo(), None);
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut manager = UndoRedoManager::new();
        manager.add_state(&1);
        manager.add_state(&2);
        manager.undo();
        manager.add_state(&5);

        assert_eq!(manager.redo(), None);
        assert_eq!(manager.undo(), Some(1));
    }

    #[test]
    fn reset_restores_initial_state_undoably() {
        let mut manager = UndoRedoManager::new();
        manager.set_initial_state(&0);
        manager.add_state(&0);
        manager.add_state(&7);

        assert_eq!(manager.reset(), Some(0));
        assert_eq!(manager.undo(), Some(7));
    }
}
