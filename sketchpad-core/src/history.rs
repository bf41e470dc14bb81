//! # History
//!
//! Whole-raster snapshot undo. Every user-visible mutation captures the full
//! global state - all layer pixel buffers, the background, the active-layer
//! pointer, and the workspace extent. History is linear and branch-free:
//! redo is never exposed, and committing after an undo discards the
//! abandoned entries past the cursor.

use crate::color::Color;
use crate::layer::{Layer, LayerId};
use crate::surface::Surface;

/// Immutable capture of the complete drawing state.
#[derive(Clone)]
pub struct Snapshot<S> {
    pub background: Color,
    pub active: LayerId,
    pub extent: u32,
    /// Every layer's metadata and a deep copy of its pixel buffer, bottom to
    /// top.
    pub layers: Vec<Layer<S>>,
}

pub struct History<S> {
    entries: Vec<Snapshot<S>>,
    /// Index of the currently-displayed entry. Invariant: in bounds whenever
    /// `entries` is non-empty.
    cursor: usize,
}

impl<S: Surface> History<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
        }
    }
    /// Append a snapshot and point the cursor at it.
    ///
    /// Unless `skip_truncate`, entries past the cursor are discarded first -
    /// the only place divergent "future" history is lost. `skip_truncate`
    /// exists for the initial capture, which must not truncate.
    pub fn commit(&mut self, snapshot: Snapshot<S>, skip_truncate: bool) {
        if !skip_truncate && !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot);
        self.cursor = self.entries.len() - 1;
        log::debug!(
            "committed snapshot {}/{} ({} layers)",
            self.cursor + 1,
            self.entries.len(),
            self.entries[self.cursor].layers.len()
        );
    }
    /// Step the cursor back and return the snapshot to restore. `None` - and
    /// no state change - when already at the first entry.
    pub fn undo(&mut self) -> Option<&Snapshot<S>> {
        if self.cursor == 0 {
            log::trace!("undo refused at history origin");
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }
    /// The entry the cursor points at.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot<S>> {
        self.entries.get(self.cursor)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<S: Surface> Default for History<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{History, Snapshot};
    use crate::color::Color;
    use crate::layer::{LayerId, LayerStack};
    use crate::surface::Surface;

    #[derive(Clone, Debug, PartialEq)]
    struct Mock(u32);
    impl Surface for Mock {
        fn blank(extent: u32) -> Self {
            Self(extent)
        }
        fn extent(&self) -> u32 {
            self.0
        }
        fn resize_preserving(&mut self, extent: u32) {
            self.0 = extent;
        }
    }

    fn snap(label: u8) -> Snapshot<Mock> {
        // The label rides in the background red channel so entries can be
        // told apart.
        let stack = LayerStack::<Mock>::new(1200);
        Snapshot {
            background: Color::new(label, 0, 0, 0xFF),
            active: stack.active_id(),
            extent: 1200,
            layers: stack.iter().cloned().collect(),
        }
    }
    fn labels(history: &History<Mock>) -> Vec<u8> {
        (0..history.len())
            .map(|i| history.entries[i].background.r)
            .collect()
    }

    #[test]
    fn commit_after_undo_truncates() {
        let mut history = History::new();
        history.commit(snap(0), true); // initial
        history.commit(snap(1), false); // A
        history.commit(snap(2), false); // B
        assert_eq!(history.undo().map(|s| s.background.r), Some(1));
        history.commit(snap(3), false); // C
        assert_eq!(labels(&history), vec![0, 1, 3]);
        assert_eq!(history.cursor(), 2);
    }
    #[test]
    fn undo_at_origin_is_noop() {
        let mut history = History::new();
        history.commit(snap(0), true);
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.current().map(|s| s.background.r), Some(0));
    }
    #[test]
    fn skip_truncate_preserves_tail() {
        let mut history = History::new();
        history.commit(snap(0), true);
        history.commit(snap(1), false);
        history.commit(snap(2), false);
        let _ = history.undo();
        let _ = history.undo();
        // A capture that must not eat the redo tail.
        history.commit(snap(9), true);
        assert_eq!(labels(&history), vec![0, 1, 2, 9]);
        assert_eq!(history.cursor(), 3);
    }
    #[test]
    fn cursor_stays_in_bounds() {
        let mut history = History::new();
        history.commit(snap(0), true);
        for label in 1..5 {
            history.commit(snap(label), false);
        }
        while history.undo().is_some() {}
        assert_eq!(history.cursor(), 0);
        history.commit(snap(7), false);
        assert_eq!(labels(&history), vec![0, 7]);
    }
    #[test]
    fn ids_survive_capture() {
        let stack = LayerStack::<Mock>::new(1200);
        let id: LayerId = stack.active_id();
        let snapshot = Snapshot {
            background: Color::WHITE,
            active: id,
            extent: 1200,
            layers: stack.iter().cloned().collect(),
        };
        let mut history = History::new();
        history.commit(snapshot, true);
        assert_eq!(history.current().unwrap().active, id);
        assert_eq!(history.current().unwrap().layers[0].id, id);
    }
}
