//! Windowing adapter between the row builders and a virtualized renderer.
//!
//! [`VirtualRows`] owns the rows produced by the last
//! [`build_visible`](crate::visible::build_visible) or
//! [`search`](crate::search::search) call and answers the questions a
//! windowing list asks: how many rows, how tall is row `i`, what is its key,
//! and which rows intersect the viewport at the current scroll offset. Rows
//! outside the window are never touched.
//!
//! Offsets and sizes are in pixels.
//!
//! # Example
//!
//! ```
//! use pagepick::virtualized::{RowSize, VirtualRows};
//!
//! let rows = VirtualRows::new(RowSize::Fixed(28)).with_overscan(1);
//! assert_eq!(rows.count(), 0);
//! assert_eq!(rows.render_range(280), 0..0);
//! ```

use crate::fenwick::FenwickTree;
use crate::row::Row;
use std::ops::Range;

/// Default row height, matching the picker's item size.
pub const DEFAULT_ROW_HEIGHT: u32 = 28;

/// Per-row size strategy.
#[derive(Debug, Clone)]
pub enum RowSize {
    /// Every row has the same height.
    Fixed(u32),
    /// Rows start at a default height and may be re-measured individually.
    Variable(VariableHeights),
}

impl Default for RowSize {
    fn default() -> Self {
        Self::Fixed(DEFAULT_ROW_HEIGHT)
    }
}

/// Measured row heights with O(log n) offset queries.
#[derive(Debug, Clone)]
pub struct VariableHeights {
    tree: FenwickTree,
    default_height: u32,
}

impl VariableHeights {
    #[must_use]
    pub fn new(default_height: u32) -> Self {
        Self {
            tree: FenwickTree::new(0),
            default_height: default_height.max(1),
        }
    }

    #[must_use]
    pub fn default_height(&self) -> u32 {
        self.default_height
    }

    fn reset(&mut self, len: usize) {
        self.tree = FenwickTree::from_values(&vec![self.default_height; len]);
    }

    fn get(&self, index: usize) -> u32 {
        if index < self.tree.len() {
            self.tree.get(index)
        } else {
            self.default_height
        }
    }

    fn set(&mut self, index: usize, height: u32) {
        self.tree.set(index, height.max(1));
    }

    fn offset_of(&self, index: usize) -> u32 {
        if index == 0 || self.tree.is_empty() {
            0
        } else if index >= self.tree.len() {
            self.tree.total()
        } else {
            self.tree.prefix(index - 1)
        }
    }

    fn index_at(&self, offset: u32) -> usize {
        // Row i covers [offset_of(i), offset_of(i + 1)).
        match self.tree.find_prefix(offset) {
            Some(i) => (i + 1).min(self.tree.len().saturating_sub(1)),
            None => 0,
        }
    }
}

/// Rows plus scroll state for a windowing renderer.
#[derive(Debug, Clone)]
pub struct VirtualRows {
    rows: Vec<Row>,
    size: RowSize,
    scroll_offset: u32,
    overscan: usize,
}

impl Default for VirtualRows {
    fn default() -> Self {
        Self::new(RowSize::default())
    }
}

/// A row selected for drawing, with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRow<'a> {
    pub index: usize,
    /// Distance from the top of the list.
    pub offset: u32,
    pub size: u32,
    pub row: &'a Row,
}

impl VirtualRows {
    #[must_use]
    pub fn new(size: RowSize) -> Self {
        let size = match size {
            RowSize::Fixed(height) => RowSize::Fixed(height.max(1)),
            variable => variable,
        };
        Self {
            rows: Vec::new(),
            size,
            scroll_offset: 0,
            overscan: 2,
        }
    }

    /// Extra rows rendered above and below the viewport.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Replace the rows, keeping the scroll offset when it is still in range.
    ///
    /// Variable heights are reset to the default since indices now refer to
    /// different rows.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        if let RowSize::Variable(heights) = &mut self.size {
            heights.reset(self.rows.len());
        }
        self.scroll_offset = self.scroll_offset.min(self.max_scroll_hint());
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Height of row `index`.
    #[must_use]
    pub fn size(&self, index: usize) -> u32 {
        match &self.size {
            RowSize::Fixed(height) => *height,
            RowSize::Variable(heights) => heights.get(index),
        }
    }

    /// Record a measured height. Ignored for fixed sizes.
    pub fn set_size(&mut self, index: usize, height: u32) {
        if index >= self.rows.len() {
            return;
        }
        if let RowSize::Variable(heights) = &mut self.size {
            heights.set(index, height);
        }
    }

    /// Stable key for row `index`: the record id.
    #[must_use]
    pub fn key_for(&self, index: usize) -> Option<&str> {
        self.rows.get(index).map(|row| row.id.as_str())
    }

    /// Row by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Index of the row with `id`.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Total list height.
    #[must_use]
    pub fn total_size(&self) -> u32 {
        self.offset_of(self.rows.len())
    }

    /// Top offset of row `index`; `index == count()` gives the total height.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> u32 {
        let index = index.min(self.rows.len());
        match &self.size {
            RowSize::Fixed(height) => {
                u32::try_from(index).map_or(u32::MAX, |i| i.saturating_mul(*height))
            }
            RowSize::Variable(heights) => heights.offset_of(index),
        }
    }

    /// Row covering pixel `offset`, clamped to the last row.
    #[must_use]
    pub fn index_at(&self, offset: u32) -> usize {
        if self.rows.is_empty() {
            return 0;
        }
        let last = self.rows.len() - 1;
        match &self.size {
            RowSize::Fixed(height) => ((offset / height) as usize).min(last),
            RowSize::Variable(heights) => heights.index_at(offset).min(last),
        }
    }

    #[must_use]
    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    /// Largest offset that still shows a full viewport.
    #[must_use]
    pub fn max_scroll(&self, viewport: u32) -> u32 {
        self.total_size().saturating_sub(viewport)
    }

    fn max_scroll_hint(&self) -> u32 {
        // Without a viewport, keep the last row reachable.
        let last = self.rows.len().saturating_sub(1);
        self.offset_of(last)
    }

    /// Scroll by a signed pixel delta, clamped to the list.
    pub fn scroll_by(&mut self, delta: i64, viewport: u32) {
        let max = i64::from(self.max_scroll(viewport));
        let next = (i64::from(self.scroll_offset) + delta).clamp(0, max);
        self.scroll_offset = u32::try_from(next).unwrap_or(0);
    }

    /// Scroll to an absolute offset, clamped to the list.
    pub fn scroll_to(&mut self, offset: u32, viewport: u32) {
        self.scroll_offset = offset.min(self.max_scroll(viewport));
    }

    /// Scroll the minimum amount that brings row `index` fully into view.
    pub fn scroll_to_index(&mut self, index: usize, viewport: u32) {
        if self.rows.is_empty() {
            return;
        }
        let index = index.min(self.rows.len() - 1);
        let top = self.offset_of(index);
        let bottom = top.saturating_add(self.size(index));
        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if bottom > self.scroll_offset.saturating_add(viewport) {
            self.scroll_offset = bottom.saturating_sub(viewport);
        }
        self.scroll_offset = self.scroll_offset.min(self.max_scroll(viewport));
    }

    /// Rows intersecting `[scroll_offset, scroll_offset + viewport)`.
    #[must_use]
    pub fn visible_range(&self, viewport: u32) -> Range<usize> {
        if self.rows.is_empty() || viewport == 0 {
            return 0..0;
        }
        let start = self.index_at(self.scroll_offset);
        let bottom = self.scroll_offset.saturating_add(viewport);
        let mut end = self.index_at(bottom.saturating_sub(1)) + 1;
        end = end.min(self.rows.len()).max(start + 1);
        start..end
    }

    /// Visible range widened by the overscan margin.
    #[must_use]
    pub fn render_range(&self, viewport: u32) -> Range<usize> {
        let visible = self.visible_range(viewport);
        if visible.is_empty() {
            return visible;
        }
        let start = visible.start.saturating_sub(self.overscan);
        let end = visible
            .end
            .saturating_add(self.overscan)
            .min(self.rows.len());
        start..end
    }

    /// Rows to draw for `viewport`, with their offsets.
    pub fn window(&self, viewport: u32) -> impl Iterator<Item = WindowRow<'_>> + '_ {
        self.render_range(viewport).map(move |index| WindowRow {
            index,
            offset: self.offset_of(index),
            size: self.size(index),
            row: &self.rows[index],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row::tree(&Record::new(format!("page-{i}"), format!("Page {i}")), 0, false, false))
            .collect()
    }

    fn fixed(n: usize) -> VirtualRows {
        let mut virt = VirtualRows::new(RowSize::Fixed(28)).with_overscan(2);
        virt.set_rows(rows(n));
        virt
    }

    #[test]
    fn count_size_key() {
        let virt = fixed(3);
        assert_eq!(virt.count(), 3);
        assert_eq!(virt.size(1), 28);
        assert_eq!(virt.key_for(2), Some("page-2"));
        assert_eq!(virt.key_for(3), None);
        assert_eq!(virt.total_size(), 84);
    }

    #[test]
    fn visible_range_at_top() {
        let virt = fixed(100);
        assert_eq!(virt.visible_range(280), 0..10);
        assert_eq!(virt.render_range(280), 0..12);
    }

    #[test]
    fn partial_rows_count_as_visible() {
        let mut virt = fixed(100);
        virt.scroll_to(14, 280);
        // Rows 0..=10 intersect [14, 294).
        assert_eq!(virt.visible_range(280), 0..11);
    }

    #[test]
    fn scrolled_window_uses_overscan_on_both_sides() {
        let mut virt = fixed(100);
        virt.scroll_to(28 * 50, 280);
        assert_eq!(virt.visible_range(280), 50..60);
        assert_eq!(virt.render_range(280), 48..62);
        let offsets: Vec<_> = virt.window(280).map(|w| (w.index, w.offset)).collect();
        assert_eq!(offsets.first(), Some(&(48, 48 * 28)));
        assert_eq!(offsets.len(), 14);
    }

    #[test]
    fn scroll_is_clamped() {
        let mut virt = fixed(20);
        virt.scroll_by(-100, 280);
        assert_eq!(virt.scroll_offset(), 0);
        virt.scroll_by(10_000, 280);
        assert_eq!(virt.scroll_offset(), 20 * 28 - 280);
        assert_eq!(virt.visible_range(280), 10..20);
    }

    #[test]
    fn shrinking_rows_clamps_scroll() {
        let mut virt = fixed(100);
        virt.scroll_to(28 * 90, 280);
        virt.set_rows(rows(3));
        assert!(virt.scroll_offset() <= 28 * 2);
        assert!(!virt.visible_range(280).is_empty());
    }

    #[test]
    fn scroll_to_index_reveals_row() {
        let mut virt = fixed(100);
        virt.scroll_to_index(30, 280);
        let range = virt.visible_range(280);
        assert!(range.contains(&30));
        virt.scroll_to_index(2, 280);
        assert_eq!(virt.scroll_offset(), 56);
    }

    #[test]
    fn variable_heights() {
        let mut virt = VirtualRows::new(RowSize::Variable(VariableHeights::new(20))).with_overscan(0);
        virt.set_rows(rows(5));
        virt.set_size(1, 60);
        assert_eq!(virt.size(1), 60);
        assert_eq!(virt.offset_of(2), 80);
        assert_eq!(virt.total_size(), 140);
        assert_eq!(virt.index_at(0), 0);
        assert_eq!(virt.index_at(19), 0);
        assert_eq!(virt.index_at(20), 1);
        assert_eq!(virt.index_at(79), 1);
        assert_eq!(virt.index_at(80), 2);
        assert_eq!(virt.visible_range(50), 0..2);
    }

    #[test]
    fn set_rows_resets_measurements() {
        let mut virt = VirtualRows::new(RowSize::Variable(VariableHeights::new(20)));
        virt.set_rows(rows(3));
        virt.set_size(0, 90);
        virt.set_rows(rows(3));
        assert_eq!(virt.size(0), 20);
    }

    #[test]
    fn fixed_size_ignores_measurements() {
        let mut virt = fixed(3);
        virt.set_size(0, 90);
        assert_eq!(virt.size(0), 28);
    }

    #[test]
    fn empty_and_zero_viewport() {
        let virt = fixed(0);
        assert_eq!(virt.visible_range(280), 0..0);
        assert_eq!(virt.window(280).count(), 0);
        let virt = fixed(5);
        assert_eq!(virt.visible_range(0), 0..0);
    }

    #[test]
    fn zero_fixed_height_is_clamped() {
        let mut virt = VirtualRows::new(RowSize::Fixed(0));
        virt.set_rows(rows(3));
        assert_eq!(virt.size(0), 1);
        assert_eq!(virt.index_at(2), 2);
    }

    #[test]
    fn position_finds_row() {
        let virt = fixed(4);
        assert_eq!(virt.position("page-3"), Some(3));
        assert_eq!(virt.position("missing"), None);
    }
}
