//! Subtree contours for the contour-merging layout pass.
//!
//! A contour is a pair of per-level delta sequences: index 0 is the subtree
//! root's own level, index `j` is `j` levels below it. Prefix sums of `left`
//! (resp. `right`) give the leftmost (rightmost) horizontal extent at each
//! level, relative to the subtree root's x = 0.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub left: Vec<i32>,
    pub right: Vec<i32>,
}

impl Contour {
    /// Contour of a single node of the given half-width.
    pub fn leaf(half_width: i32) -> Self {
        Self {
            left: vec![-half_width],
            right: vec![half_width],
        }
    }

    /// Minimum horizontal distance between this contour's origin and the
    /// next sibling's origin so that the two silhouettes do not cross at any
    /// shared level. Never negative; padding is added by the caller.
    pub fn min_separation(&self, next: &Self) -> i32 {
        let mut distance = 0;
        let mut sum_right = 0;
        let mut sum_left = 0;
        for level in 0..self.right.len().min(next.left.len()) {
            sum_right += self.right[level];
            sum_left += next.left[level];
            distance = distance.max(sum_right - sum_left);
        }
        distance
    }

    /// Merges the next sibling's contour into this one, with the sibling's
    /// origin `distance` to the right of this contour's current origin.
    ///
    /// The merged right silhouette is the sibling's, with this contour's
    /// deeper tail spliced back on where the sibling is shallower; the left
    /// silhouette keeps this contour's levels and splices the sibling's
    /// deeper tail on. After the merge the right side is rooted at the
    /// sibling's origin while the left side stays rooted at the first
    /// child's origin, matching how the shift accumulation consumes them.
    pub fn merge(&mut self, next: Self, distance: i32) {
        let mut new_right = next.right;
        let visible_from = new_right.len();
        if self.right.len() > visible_from {
            // old right contour still visible below the new subtree
            let rebase = -new_right.iter().sum::<i32>() - distance
                + self.right[..=visible_from].iter().sum::<i32>();
            new_right.push(rebase);
            new_right.extend_from_slice(&self.right[visible_from + 1..]);
        }
        self.right = new_right;

        let visible_from = self.left.len();
        if next.left.len() > visible_from {
            // new left contour visible below everything merged so far
            let rebase = -self.left.iter().sum::<i32>() + distance
                + next.left[..=visible_from].iter().sum::<i32>();
            self.left.push(rebase);
            self.left.extend_from_slice(&next.left[visible_from + 1..]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extents(deltas: &[i32]) -> Vec<i32> {
        deltas
            .iter()
            .scan(0, |acc, delta| {
                *acc += delta;
                Some(*acc)
            })
            .collect()
    }

    #[test]
    fn leaf_contour_spans_half_width() {
        let contour = Contour::leaf(12);
        assert_eq!(contour.left, vec![-12]);
        assert_eq!(contour.right, vec![12]);
    }

    #[test]
    fn separation_of_equal_leaves() {
        let a = Contour::leaf(10);
        let b = Contour::leaf(10);
        // right extent 10, left extent -10: origins must be 20 apart
        assert_eq!(a.min_separation(&b), 20);
    }

    #[test]
    fn separation_scans_all_shared_levels() {
        // narrow on top, wide two levels down
        let a = Contour {
            left: vec![-5, -10, -20],
            right: vec![5, 10, 20],
        };
        let b = Contour::leaf(5);
        // only level 0 is shared with a leaf
        assert_eq!(a.min_separation(&b), 10);
        let wide_leaf_column = Contour {
            left: vec![-5, 0, 0],
            right: vec![5, 0, 0],
        };
        // deepest level of `a` reaches 35; b's column holds -5 at each level
        assert_eq!(a.min_separation(&wide_leaf_column), 40);
    }

    #[test]
    fn merge_keeps_deeper_right_tail() {
        let mut combined = Contour {
            left: vec![-5, -10],
            right: vec![5, 10],
        };
        let next = Contour::leaf(5);
        let distance = combined.min_separation(&next) + 50;
        combined.merge(next, distance);

        // right silhouette: the new leaf at level 0, then the old subtree's
        // deeper level rebased into the leaf's frame
        assert_eq!(combined.right.len(), 2);
        let right = extents(&combined.right);
        // old right extent at level 1 was 15, origins are `distance` apart
        assert_eq!(right[1], 15 - distance);
        // left silhouette unchanged: the old contour is at least as deep
        assert_eq!(combined.left, vec![-5, -10]);
    }

    #[test]
    fn merge_splices_deeper_left_tail() {
        let mut combined = Contour::leaf(5);
        let next = Contour {
            left: vec![-5, -10, -3],
            right: vec![5, 10, 3],
        };
        let distance = combined.min_separation(&next) + 50;
        combined.merge(next.clone(), distance);

        // right silhouette is wholly the new subtree's
        assert_eq!(combined.right, next.right);
        // left silhouette: old leaf on top, new subtree's lower levels
        // rebased by the origin distance
        assert_eq!(combined.left.len(), 3);
        let left = extents(&combined.left);
        let next_left = extents(&next.left);
        assert_eq!(left[0], -5);
        assert_eq!(left[1], next_left[1] + distance);
        assert_eq!(left[2], next_left[2] + distance);
    }
}
