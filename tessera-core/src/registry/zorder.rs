//! Z-order policy
//!
//! Index 0 is the bottom-most entry and paints first. Two layering rules
//! hold after every mutation:
//!
//! - FixedBottom entries form a contiguous prefix
//! - Modal entries form a contiguous suffix
//!
//! Both are restored with a stable sort on a three-level rank, which keeps
//! the relative order inside each group (the same result as partitioning
//! FixedBottom to the front and then Modal to the back).

use alloc::vec::Vec;

use crate::window::{WindowError, WindowId, WindowKind};

/// Anything that can be placed in the z-order
pub trait Layered {
    fn id(&self) -> WindowId;
    fn kind(&self) -> WindowKind;
}

fn rank(kind: WindowKind) -> u8 {
    match kind {
        WindowKind::FixedBottom => 0,
        WindowKind::Modal => 2,
        _ => 1,
    }
}

/// Back-to-front window order
#[derive(Debug, Clone)]
pub struct ZOrder<T> {
    entries: Vec<T>,
}

impl<T> Default for ZOrder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ZOrder<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries bottom to top
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    /// Top-most entry (the foreground window)
    pub fn top(&self) -> Option<&T> {
        self.entries.last()
    }
}

impl<T: Layered> ZOrder<T> {
    /// Index of the top-most Modal or Popup, or `len()` if there is none
    pub fn foreground_index(&self) -> usize {
        self.entries
            .iter()
            .rposition(|e| e.kind().is_overlay())
            .unwrap_or(self.entries.len())
    }

    /// Where a new window of `kind` goes
    ///
    /// FixedBottom at the very bottom, overlays on top, everything else
    /// directly below the top-most overlay.
    pub fn insertion_index(&self, kind: WindowKind) -> usize {
        match kind {
            WindowKind::FixedBottom => 0,
            WindowKind::Normal | WindowKind::Floating => self.foreground_index(),
            WindowKind::Modal | WindowKind::Popup => self.entries.len(),
        }
    }

    /// Insert by kind and return the resulting index
    pub fn insert(&mut self, entry: T) -> usize {
        let id = entry.id();
        let index = self.insertion_index(entry.kind());
        self.entries.insert(index, entry);
        self.enforce();
        self.index_of(id).unwrap_or(index)
    }

    pub fn index_of(&self, id: WindowId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn find(&self, id: WindowId) -> Option<&T> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Take an entry out of the order
    pub fn remove(&mut self, id: WindowId) -> Option<T> {
        let index = self.index_of(id)?;
        Some(self.entries.remove(index))
    }

    /// Move to the top, then restore layering
    pub fn bring_to_front(&mut self, id: WindowId) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::UnknownWindow)?;
        let entry = self.entries.remove(index);
        self.entries.push(entry);
        self.enforce();
        Ok(())
    }

    /// Move to the bottom, then restore layering
    ///
    /// A Modal window ends up back on top.
    pub fn send_to_back(&mut self, id: WindowId) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::UnknownWindow)?;
        let entry = self.entries.remove(index);
        self.entries.insert(0, entry);
        self.enforce();
        Ok(())
    }

    /// Swap with the entry above
    ///
    /// No-op for FixedBottom windows and for the top entry.
    pub fn move_up(&mut self, id: WindowId) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::UnknownWindow)?;
        if index + 1 < self.entries.len() && self.entries[index].kind() != WindowKind::FixedBottom {
            self.entries.swap(index, index + 1);
            self.enforce();
        }
        Ok(())
    }

    /// Swap with the entry below
    ///
    /// No-op for Modal windows and for the bottom entry.
    pub fn move_down(&mut self, id: WindowId) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::UnknownWindow)?;
        if index > 0 && self.entries[index].kind() != WindowKind::Modal {
            self.entries.swap(index, index - 1);
            self.enforce();
        }
        Ok(())
    }

    /// Restore the FixedBottom prefix and Modal suffix
    pub fn enforce(&mut self) {
        self.entries.sort_by_key(|e| rank(e.kind()));
    }

    /// Check both layering rules
    pub fn is_layered(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| rank(pair[0].kind()) <= rank(pair[1].kind()))
    }
}
