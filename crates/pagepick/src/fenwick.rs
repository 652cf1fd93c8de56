//! Fenwick tree (binary indexed tree) over `u32` values.
//!
//! Backs variable row sizes in [`crate::virtualized`]: point updates, prefix
//! sums and "largest index whose prefix fits" are all O(log n). Arithmetic
//! wraps so arbitrary inputs never panic.

/// Prefix-sum tree over `u32` values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenwickTree {
    /// 1-based internal array; `tree[0]` is unused.
    tree: Vec<u32>,
}

impl FenwickTree {
    /// Tree of `len` zeros.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            tree: vec![0; len + 1],
        }
    }

    /// Build from values in O(n).
    #[must_use]
    pub fn from_values(values: &[u32]) -> Self {
        let mut tree = Vec::with_capacity(values.len() + 1);
        tree.push(0);
        tree.extend_from_slice(values);
        let n = values.len();
        for i in 1..=n {
            let parent = i + lowbit(i);
            if parent <= n {
                tree[parent] = tree[parent].wrapping_add(tree[i]);
            }
        }
        Self { tree }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add `delta` at `index`.
    pub fn update(&mut self, index: usize, delta: i32) {
        let n = self.len();
        if index >= n {
            return;
        }
        let mut i = index + 1;
        while i <= n {
            self.tree[i] = self.tree[i].wrapping_add_signed(delta);
            i += lowbit(i);
        }
    }

    /// Overwrite the value at `index`.
    pub fn set(&mut self, index: usize, value: u32) {
        if index >= self.len() {
            return;
        }
        let delta = value.wrapping_sub(self.get(index));
        let n = self.len();
        let mut i = index + 1;
        while i <= n {
            self.tree[i] = self.tree[i].wrapping_add(delta);
            i += lowbit(i);
        }
    }

    /// Sum of values `0..=index`; clamps `index` to the last element.
    #[must_use]
    pub fn prefix(&self, index: usize) -> u32 {
        if self.is_empty() {
            return 0;
        }
        let mut i = index.min(self.len() - 1) + 1;
        let mut sum = 0u32;
        while i > 0 {
            sum = sum.wrapping_add(self.tree[i]);
            i -= lowbit(i);
        }
        sum
    }

    /// Sum of values `start..=end`.
    #[must_use]
    pub fn range(&self, start: usize, end: usize) -> u32 {
        if start > end || start >= self.len() {
            return 0;
        }
        let upper = self.prefix(end);
        if start == 0 {
            upper
        } else {
            upper.wrapping_sub(self.prefix(start - 1))
        }
    }

    /// Value at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> u32 {
        self.range(index, index)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.prefix(self.len() - 1)
        }
    }

    /// Grow with zeros or truncate, keeping existing values.
    pub fn resize(&mut self, len: usize) {
        if len == self.len() {
            return;
        }
        let keep = len.min(self.len());
        let values: Vec<u32> = (0..keep).map(|i| self.get(i)).collect();
        let mut resized = Self::new(len);
        for (i, value) in values.into_iter().enumerate() {
            resized.set(i, value);
        }
        *self = resized;
    }

    /// Largest index `i` with `prefix(i) <= target`, or `None` when even the
    /// first value exceeds `target`.
    ///
    /// Assumes the prefix sums do not wrap, which holds for row sizes.
    #[must_use]
    pub fn find_prefix(&self, target: u32) -> Option<usize> {
        let n = self.len();
        if n == 0 {
            return None;
        }
        let mut position = 0usize;
        let mut remaining = target;
        let mut step = highest_power_of_two_at_most(n);
        while step > 0 {
            let next = position + step;
            if next <= n && self.tree[next] <= remaining {
                position = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }
        // `position` is the count of leading values that fit.
        position.checked_sub(1)
    }
}

#[inline]
fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_power_of_two_at_most(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_values_matches_updates() {
        let values = [3u32, 1, 4, 1, 5, 9, 2, 6];
        let bulk = FenwickTree::from_values(&values);
        let mut seq = FenwickTree::new(values.len());
        for (i, &v) in values.iter().enumerate() {
            seq.update(i, v as i32);
        }
        assert_eq!(bulk, seq);
        assert_eq!(bulk.total(), 31);
        assert_eq!(bulk.prefix(2), 8);
        assert_eq!(bulk.range(3, 5), 15);
    }

    #[test]
    fn set_and_get() {
        let mut ft = FenwickTree::from_values(&[28, 28, 28]);
        ft.set(1, 56);
        assert_eq!(ft.get(1), 56);
        assert_eq!(ft.total(), 112);
    }

    #[test]
    fn find_prefix_locates_offsets() {
        let ft = FenwickTree::from_values(&[10, 10, 10]);
        assert_eq!(ft.find_prefix(5), None);
        assert_eq!(ft.find_prefix(10), Some(0));
        assert_eq!(ft.find_prefix(19), Some(0));
        assert_eq!(ft.find_prefix(20), Some(1));
        assert_eq!(ft.find_prefix(1_000), Some(2));
    }

    #[test]
    fn resize_keeps_values() {
        let mut ft = FenwickTree::from_values(&[1, 2, 3]);
        ft.resize(5);
        assert_eq!((0..5).map(|i| ft.get(i)).collect::<Vec<_>>(), [1, 2, 3, 0, 0]);
        ft.resize(2);
        assert_eq!(ft.total(), 3);
    }

    #[test]
    fn empty_tree_is_inert() {
        let mut ft = FenwickTree::new(0);
        ft.update(0, 5);
        ft.set(3, 1);
        assert_eq!(ft.total(), 0);
        assert_eq!(ft.prefix(10), 0);
        assert_eq!(ft.find_prefix(0), None);
    }
}
