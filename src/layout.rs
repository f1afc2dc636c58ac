//! Tree layout for feature models, an adaptation of the Reingold-Tilford
//! contour-merging algorithm. The drawing is planar and leveled, each parent
//! is horizontally centered over its children, and sibling subtrees are kept
//! as close as the label widths allow. Collapsed features are treated as
//! leaves; their descendants receive no coordinates.
//!
//! The engine is a pure function of the model, the expanded state and the
//! config: it never mutates its inputs, and re-running it on an unchanged
//! model yields the identical position map. Callers re-run it after every
//! structural edit or expand/collapse toggle.

mod contour;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::model::{FeatureId, FeatureModel};
use crate::text_metrics::NodeWidthEstimator;
use contour::Contour;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Per-feature expanded/collapsed flags. Features not present in the map
/// count as expanded; the editor initializes every feature as expanded when
/// it is first added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpandedState {
    expanded: HashMap<FeatureId, bool>,
}

impl ExpandedState {
    /// All features of the model marked expanded.
    pub fn initialize(model: &FeatureModel) -> Self {
        let expanded = model.iter().map(|id| (id, true)).collect();
        Self { expanded }
    }

    pub fn is_expanded(&self, id: FeatureId) -> bool {
        self.expanded.get(&id).copied().unwrap_or(true)
    }

    pub fn expand(&mut self, id: FeatureId) {
        self.expanded.insert(id, true);
    }

    pub fn collapse(&mut self, id: FeatureId) {
        self.expanded.insert(id, false);
    }

    pub fn toggle(&mut self, id: FeatureId) {
        let flipped = !self.is_expanded(id);
        self.expanded.insert(id, flipped);
    }
}

/// Computes coordinates for every visible feature of the model.
pub fn compute_layout(
    model: &FeatureModel,
    expanded: &ExpandedState,
    config: &LayoutConfig,
    estimator: &dyn NodeWidthEstimator,
) -> HashMap<FeatureId, Point> {
    LayoutEngine::new(model, expanded, config, estimator).compute_positions()
}

/// One-shot layout computation. Build a fresh engine per layout pass; the
/// engine does not observe model mutations.
pub struct LayoutEngine<'a> {
    model: &'a FeatureModel,
    expanded: &'a ExpandedState,
    config: &'a LayoutConfig,
    estimator: &'a dyn NodeWidthEstimator,
    /// Final positions, filled for every visited feature.
    pos: HashMap<FeatureId, Point>,
    /// Horizontal offsets relative to the parent's resolved x.
    shift: HashMap<FeatureId, i32>,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(
        model: &'a FeatureModel,
        expanded: &'a ExpandedState,
        config: &'a LayoutConfig,
        estimator: &'a dyn NodeWidthEstimator,
    ) -> Self {
        Self {
            model,
            expanded,
            config,
            estimator,
            pos: HashMap::new(),
            shift: HashMap::new(),
        }
    }

    /// Runs the three passes and returns the position map, keyed by feature
    /// id. Descendants of collapsed features have no entry.
    pub fn compute_positions(mut self) -> HashMap<FeatureId, Point> {
        let root = self.model.root();
        self.assign_depth(root, 0);
        self.compute_shift(root);
        self.assign_x(root);
        self.pos
    }

    /// Estimated half-width of a feature's label, capped so that a very long
    /// name cannot push neighboring subtrees arbitrarily far apart.
    fn half_width(&self, id: FeatureId) -> i32 {
        self.estimator
            .half_width(&self.model[id].name)
            .clamp(0, self.config.max_node_width / 2)
    }

    /// Pass 1: leveled y coordinates by pre-order traversal.
    fn assign_depth(&mut self, id: FeatureId, depth: i32) {
        let y = depth * self.config.level_height + self.config.level_offset;
        self.pos.insert(id, Point { x: 0, y });
        if self.expanded.is_expanded(id) {
            for &child in &self.model[id].children {
                self.assign_depth(child, depth + 1);
            }
        }
    }

    /// Pass 2: bottom-up contour computation. Returns the contour of the
    /// subtree rooted at `id` and records the x shift of each of its
    /// children. The node's own shift is recorded by its parent's
    /// invocation; the root has none.
    fn compute_shift(&mut self, id: FeatureId) -> Contour {
        let half_width = self.half_width(id);
        if !self.expanded.is_expanded(id) || self.model[id].children.is_empty() {
            return Contour::leaf(half_width);
        }

        let children = self.model[id].children.clone();
        let contours: Vec<Contour> = children
            .iter()
            .map(|&child| self.compute_shift(child))
            .collect();

        // distances[i] is the gap between the origins of the (i-1)-th and
        // the i-th child; merge left to right so non-neighbouring subtrees
        // cannot overlap either
        let mut distances = vec![0i32; children.len()];
        let mut combined = contours[0].clone();
        for i in 1..children.len() {
            distances[i] =
                combined.min_separation(&contours[i]) + self.config.subtree_padding;
            combined.merge(contours[i].clone(), distances[i]);
        }

        // center the span of children under the parent
        let total: i32 = distances.iter().sum();
        let half_total = (total + 1) / 2; // ceil, total is never negative
        let mut accumulated = 0;
        for (i, &child) in children.iter().enumerate() {
            accumulated += distances[i];
            self.shift.insert(child, accumulated - half_total);
        }

        // the parent's own footprint is level 0; below it sits the merged
        // children silhouette, rebased so position 0 is the parent's x
        let first = children[0];
        let last = children[children.len() - 1];
        let mut left = vec![-half_width];
        left.push(self.shift[&first] + contours[0].left[0] + half_width);
        left.extend_from_slice(&combined.left[1..]);
        let mut right = vec![half_width];
        right.push(self.shift[&last] + contours[contours.len() - 1].right[0] - half_width);
        right.extend_from_slice(&combined.right[1..]);
        Contour { left, right }
    }

    /// Pass 3: top-down x resolution. The root sits at the configured
    /// anchor; every other visited feature is its parent's x plus its shift.
    fn assign_x(&mut self, id: FeatureId) {
        let x = match self.model[id].parent {
            None => self.config.root_x,
            Some(parent) => self.pos[&parent].x + self.shift[&id],
        };
        if let Some(point) = self.pos.get_mut(&id) {
            point.x = x;
        }
        if self.expanded.is_expanded(id) {
            for &child in &self.model[id].children {
                self.assign_x(child);
            }
        }
    }
}
