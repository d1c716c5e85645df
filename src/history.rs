//! Undo/redo over rope versions
//!
//! Ropes share structure, so every checkpoint costs a handful of nodes rather
//! than a copy of the document.

use tiny_rope::Rope;

/// Bounded undo/redo stacks of document versions
pub struct History {
    undo: Vec<Rope>,
    redo: Vec<Rope>,
    max_size: usize,
}

impl History {
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_size,
        }
    }

    /// Save `version` as the state to return to on undo
    pub fn checkpoint(&mut self, version: Rope) {
        self.undo.push(version);
        self.redo.clear(); // Clear redo on new edit

        if self.undo.len() > self.max_size {
            self.undo.remove(0);
        }
    }

    /// Step back, parking `current` on the redo stack
    pub fn undo(&mut self, current: Rope) -> Option<Rope> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward again, parking `current` on the undo stack
    pub fn redo(&mut self, current: Rope) -> Option<Rope> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::with_max_size(10);
        let v1 = Rope::from("one");
        let v2 = v1.concat(&Rope::from(" two"));

        history.checkpoint(v1.clone());
        let back = history.undo(v2.clone()).unwrap();
        assert_eq!(back, "one");
        assert!(history.can_redo());

        let forward = history.redo(back).unwrap();
        assert_eq!(forward, "one two");
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_checkpoint_clears_redo() {
        let mut history = History::with_max_size(10);
        history.checkpoint(Rope::from("a"));
        history.undo(Rope::from("ab"));
        assert_eq!(history.redo_depth(), 1);

        history.checkpoint(Rope::from("a"));
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_max_size_drops_oldest() {
        let mut history = History::with_max_size(2);
        for text in ["a", "b", "c"] {
            history.checkpoint(Rope::from(text));
        }
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.undo(Rope::new()).unwrap(), "c");
        assert_eq!(history.undo(Rope::new()).unwrap(), "b");
        assert!(history.undo(Rope::new()).is_none());
    }
}
