//! Page-organized 1-bit frame buffer
//!
//! Byte `pages[p][x]` holds pixels `(x, 8p)..=(x, 8p + 7)`, least
//! significant bit on top. Each page carries a dirty flag so a flush can
//! skip pages that did not change.

/// 1-bit frame, `W` pixels wide and `PAGES * 8` pixels tall
#[derive(Debug, Clone)]
pub struct FrameBuffer<const W: usize, const PAGES: usize> {
    pages: [[u8; W]; PAGES],
    dirty: [bool; PAGES],
}

impl<const W: usize, const PAGES: usize> Default for FrameBuffer<W, PAGES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const PAGES: usize> FrameBuffer<W, PAGES> {
    pub const WIDTH: usize = W;
    pub const HEIGHT: usize = PAGES * 8;

    /// Blank frame; every page starts dirty so the first flush clears the
    /// panel
    pub const fn new() -> Self {
        Self {
            pages: [[0; W]; PAGES],
            dirty: [true; PAGES],
        }
    }

    /// Set a pixel; out-of-range coordinates are ignored
    pub fn set(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 || x as usize >= W || y as usize >= Self::HEIGHT {
            return;
        }
        let page = y as usize / 8;
        let mask = 1u8 << (y as usize % 8);
        let byte = &mut self.pages[page][x as usize];
        let next = if on { *byte | mask } else { *byte & !mask };
        if next != *byte {
            *byte = next;
            self.dirty[page] = true;
        }
    }

    /// Read a pixel; out-of-range coordinates read as off
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= W || y as usize >= Self::HEIGHT {
            return false;
        }
        self.pages[y as usize / 8][x as usize] & (1 << (y as usize % 8)) != 0
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        for (page, dirty) in self.pages.iter_mut().zip(self.dirty.iter_mut()) {
            if page.iter().any(|&b| b != 0) {
                page.fill(0);
                *dirty = true;
            }
        }
    }

    /// Raw page data
    pub fn page(&self, page: usize) -> &[u8; W] {
        &self.pages[page]
    }

    pub fn is_dirty(&self, page: usize) -> bool {
        self.dirty[page]
    }

    pub fn mark_clean(&mut self, page: usize) {
        self.dirty[page] = false;
    }

    /// Force every page to be sent on the next flush
    pub fn mark_all_dirty(&mut self) {
        self.dirty = [true; PAGES];
    }

    /// Number of lit pixels
    pub fn lit_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|page| page.iter())
            .map(|b| b.count_ones() as usize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Frame = FrameBuffer<16, 2>;

    #[test]
    fn test_dimensions() {
        assert_eq!(Frame::WIDTH, 16);
        assert_eq!(Frame::HEIGHT, 16);
    }

    #[test]
    fn test_page_layout() {
        let mut frame = Frame::new();
        frame.set(3, 0, true);
        frame.set(3, 7, true);
        frame.set(4, 9, true);
        assert_eq!(frame.page(0)[3], 0b1000_0001);
        assert_eq!(frame.page(1)[4], 0b0000_0010);
        assert!(frame.get(4, 9));
        assert!(!frame.get(4, 8));
    }

    #[test]
    fn test_clipping() {
        let mut frame = Frame::new();
        frame.set(-1, 0, true);
        frame.set(16, 0, true);
        frame.set(0, 16, true);
        frame.set(0, -3, true);
        assert_eq!(frame.lit_count(), 0);
        assert!(!frame.get(16, 0));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut frame = Frame::new();
        assert!(frame.is_dirty(0) && frame.is_dirty(1));
        frame.mark_clean(0);
        frame.mark_clean(1);

        // Writing an unchanged value keeps the page clean
        frame.set(0, 0, false);
        assert!(!frame.is_dirty(0));

        frame.set(0, 12, true);
        assert!(!frame.is_dirty(0));
        assert!(frame.is_dirty(1));

        frame.mark_clean(1);
        frame.set(0, 12, false);
        assert!(frame.is_dirty(1));
    }

    #[test]
    fn test_clear_marks_only_touched_pages() {
        let mut frame = Frame::new();
        frame.set(5, 2, true);
        frame.mark_clean(0);
        frame.mark_clean(1);

        frame.clear();
        assert_eq!(frame.lit_count(), 0);
        assert!(frame.is_dirty(0));
        assert!(!frame.is_dirty(1));

        frame.mark_all_dirty();
        assert!(frame.is_dirty(1));
    }
}
