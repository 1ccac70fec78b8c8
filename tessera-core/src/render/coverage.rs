//! Per-frame coverage grid
//!
//! One bit per output pixel, set where any window rectangle lies. Rebuilt
//! from scratch every render pass; decides where the transparency mask may
//! be drawn.

use alloc::vec::Vec;

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::window::WindowError;

const WORD_BITS: usize = 32;

/// Boolean coverage matrix sized to the output resolution
#[derive(Debug, Clone)]
pub struct CoverageGrid {
    width: u16,
    height: u16,
    words: Vec<u32>,
}

impl CoverageGrid {
    /// Allocate an empty grid for a `width` x `height` output
    pub fn new(width: u16, height: u16) -> Result<Self, WindowError> {
        let bits = width as usize * height as usize;
        let word_count = bits.div_ceil(WORD_BITS);
        let mut words = Vec::new();
        words
            .try_reserve_exact(word_count)
            .map_err(|_| WindowError::OutOfMemory)?;
        words.resize(word_count, 0);
        Ok(Self {
            width,
            height,
            words,
        })
    }

    /// Grid width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Mark nothing as covered
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Mark every on-screen pixel of `rect` as covered
    pub fn cover(&mut self, rect: &Rectangle) {
        let screen = Rectangle::new(
            Point::zero(),
            Size::new(self.width as u32, self.height as u32),
        );
        let clipped = screen.intersection(rect);
        let Some(bottom_right) = clipped.bottom_right() else {
            return;
        };

        for y in clipped.top_left.y..=bottom_right.y {
            for x in clipped.top_left.x..=bottom_right.x {
                let bit = x as usize + y as usize * self.width as usize;
                self.words[bit / WORD_BITS] |= 1 << (bit % WORD_BITS);
            }
        }
    }

    /// Check if `(x, y)` is covered; off-screen pixels never are
    pub fn is_covered(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let bit = x as usize + y as usize * self.width as usize;
        self.words[bit / WORD_BITS] & (1 << (bit % WORD_BITS)) != 0
    }

    /// Number of covered pixels
    pub fn covered_count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_empty_grid() {
        let grid = CoverageGrid::new(16, 8).unwrap();
        assert_eq!(grid.covered_count(), 0);
        assert!(!grid.is_covered(0, 0));
    }

    #[test]
    fn test_cover_rect() {
        let mut grid = CoverageGrid::new(16, 8).unwrap();
        grid.cover(&rect(2, 3, 4, 2));
        assert_eq!(grid.covered_count(), 8);
        assert!(grid.is_covered(2, 3));
        assert!(grid.is_covered(5, 4));
        assert!(!grid.is_covered(6, 4));
        assert!(!grid.is_covered(2, 5));
        assert!(!grid.is_covered(1, 3));
    }

    #[test]
    fn test_union_of_overlapping_rects() {
        let mut grid = CoverageGrid::new(10, 10).unwrap();
        grid.cover(&rect(0, 0, 4, 4));
        grid.cover(&rect(2, 2, 4, 4));
        assert_eq!(grid.covered_count(), 16 + 16 - 4);
    }

    #[test]
    fn test_cover_clips_to_screen() {
        let mut grid = CoverageGrid::new(8, 8).unwrap();
        grid.cover(&rect(-2, 6, 4, 10));
        assert_eq!(grid.covered_count(), 2 * 2);
        assert!(grid.is_covered(0, 7));
        assert!(grid.is_covered(1, 6));

        // Fully off-screen rects and empty rects cover nothing
        grid.clear();
        grid.cover(&rect(8, 0, 3, 3));
        grid.cover(&rect(0, -5, 3, 5));
        grid.cover(&rect(1, 1, 0, 4));
        assert_eq!(grid.covered_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_queries() {
        let mut grid = CoverageGrid::new(4, 4).unwrap();
        grid.cover(&rect(0, 0, 4, 4));
        assert!(!grid.is_covered(-1, 0));
        assert!(!grid.is_covered(4, 0));
        assert!(!grid.is_covered(0, 4));
    }

    #[test]
    fn test_clear() {
        let mut grid = CoverageGrid::new(33, 3).unwrap();
        grid.cover(&rect(0, 0, 33, 3));
        assert_eq!(grid.covered_count(), 99);
        grid.clear();
        assert_eq!(grid.covered_count(), 0);
    }
}
