//! In-memory feature model: an arena of features indexed by [`FeatureId`],
//! cross-tree constraints, and the edit operations the editor exposes.
//!
//! Parent group cardinalities are derived automatically while the group is
//! small (first and second child); once a group exists the user owns its
//! cardinalities and edits them directly.

use std::ops::Index;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cardinality::{Cardinality, CardinalityError, Interval};

/// Stable identity of a feature: its index into the model's arena. Ids stay
/// valid across edits; removed features merely become unreachable from the
/// root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(usize);

impl FeatureId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub instance_cardinality: Cardinality,
    pub group_type_cardinality: Cardinality,
    pub group_instance_cardinality: Cardinality,
    pub parent: Option<FeatureId>,
    pub children: Vec<FeatureId>,
}

/// Cross-tree constraint between two features: `first requires second` or
/// `first excludes second`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    pub require: bool,
    pub first: FeatureId,
    pub first_cardinality: Cardinality,
    pub second: FeatureId,
    pub second_cardinality: Cardinality,
}

/// What happens to the children of a deleted inner feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Delete the feature together with all descendants.
    DeleteSubtree,
    /// Splice the children into the grandparent at the deleted feature's
    /// position, preserving sibling order.
    PromoteChildren,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("feature name `{0}` is already in use")]
    DuplicateName(String),
    #[error("feature name cannot be empty")]
    EmptyName,
    #[error("cannot delete the root feature")]
    RootDeletion,
    #[error("feature id {0} is not part of the model")]
    UnknownFeature(usize),
    #[error(transparent)]
    Cardinality(#[from] CardinalityError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureModel {
    features: Vec<Feature>,
    root: FeatureId,
    pub constraints: Vec<Constraint>,
}

impl FeatureModel {
    pub fn new(root_name: impl Into<String>, instance_cardinality: Cardinality) -> Self {
        let root = Feature {
            name: root_name.into(),
            instance_cardinality,
            group_type_cardinality: Cardinality::empty(),
            group_instance_cardinality: Cardinality::empty(),
            parent: None,
            children: Vec::new(),
        };
        Self {
            features: vec![root],
            root: FeatureId(0),
            constraints: Vec::new(),
        }
    }

    pub fn root(&self) -> FeatureId {
        self.root
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(id.0)
    }

    /// Pre-order traversal of all features reachable from the root.
    /// Detached arena slots are not visited.
    pub fn iter(&self) -> impl Iterator<Item = FeatureId> + '_ {
        let mut order = Vec::with_capacity(self.features.len());
        self.collect_subtree(self.root, &mut order);
        order.into_iter()
    }

    /// Pre-order ids of the subtree rooted at `id`, including `id` itself.
    pub fn subtree(&self, id: FeatureId) -> Vec<FeatureId> {
        let mut order = Vec::new();
        self.collect_subtree(id, &mut order);
        order
    }

    fn collect_subtree(&self, id: FeatureId, order: &mut Vec<FeatureId>) {
        order.push(id);
        for &child in &self[id].children {
            self.collect_subtree(child, order);
        }
    }

    pub fn feature_by_name(&self, name: &str) -> Option<FeatureId> {
        self.iter().find(|&id| self[id].name == name)
    }

    fn check_id(&self, id: FeatureId) -> Result<(), ModelError> {
        if id.0 < self.features.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownFeature(id.0))
        }
    }

    fn check_name(&self, name: &str, allow: Option<FeatureId>) -> Result<(), ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        let clash = self
            .iter()
            .any(|id| Some(id) != allow && self[id].name == name);
        if clash {
            return Err(ModelError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Adds a feature under `parent`. The parent's group cardinalities are
    /// derived when the new child is the first or second one; larger groups
    /// keep their user-maintained cardinalities.
    pub fn add_feature(
        &mut self,
        parent: FeatureId,
        name: &str,
        instance_cardinality: Cardinality,
    ) -> Result<FeatureId, ModelError> {
        self.check_id(parent)?;
        self.check_name(name, None)?;

        let id = FeatureId(self.features.len());
        self.features.push(Feature {
            name: name.to_string(),
            instance_cardinality,
            group_type_cardinality: Cardinality::empty(),
            group_instance_cardinality: Cardinality::empty(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.features[parent.0].children.push(id);

        match self[parent].children.len() {
            1 => self.derive_group_cards_for_one_child(parent),
            2 => self.derive_group_cards_for_children(parent),
            _ => {}
        }
        Ok(id)
    }

    /// Renames a feature and replaces its instance cardinality. If the
    /// feature is an only child, the parent's group cardinalities follow it.
    pub fn edit_feature(
        &mut self,
        id: FeatureId,
        name: &str,
        instance_cardinality: Cardinality,
    ) -> Result<(), ModelError> {
        self.check_id(id)?;
        self.check_name(name, Some(id))?;

        self.features[id.0].name = name.to_string();
        self.features[id.0].instance_cardinality = instance_cardinality;
        if let Some(parent) = self[id].parent
            && self[parent].children.len() == 1
        {
            self.derive_group_cards_for_one_child(parent);
        }
        Ok(())
    }

    /// Directly sets a feature's group cardinalities. Only meaningful for
    /// features with children; the editor offers it once a group exists.
    pub fn set_group_cardinalities(
        &mut self,
        id: FeatureId,
        group_type: Cardinality,
        group_instance: Cardinality,
    ) -> Result<(), ModelError> {
        self.check_id(id)?;
        self.features[id.0].group_type_cardinality = group_type;
        self.features[id.0].group_instance_cardinality = group_instance;
        Ok(())
    }

    /// Removes a feature. Constraints involving removed features are dropped
    /// and the former parent's group cardinalities are re-derived where the
    /// group shrank to one or zero members (or first came into existence,
    /// when promoted children turn a single child into a group).
    ///
    /// Returns `true` if the removal created a new group on the parent,
    /// signalling the editor to offer the group-cardinality dialog.
    pub fn remove_feature(
        &mut self,
        id: FeatureId,
        policy: RemovalPolicy,
    ) -> Result<bool, ModelError> {
        self.check_id(id)?;
        let Some(parent) = self[id].parent else {
            return Err(ModelError::RootDeletion);
        };

        let former_child_count = self[parent].children.len();
        let mut removed = match policy {
            RemovalPolicy::DeleteSubtree => self.subtree(id),
            RemovalPolicy::PromoteChildren => vec![id],
        };
        removed.sort_unstable();

        let position = self[parent]
            .children
            .iter()
            .position(|&child| child == id)
            .unwrap_or(0);
        let children = std::mem::take(&mut self.features[id.0].children);
        self.features[parent.0].children.remove(position);
        if policy == RemovalPolicy::PromoteChildren {
            for (offset, child) in children.iter().enumerate() {
                self.features[child.0].parent = Some(parent);
                self.features[parent.0].children.insert(position + offset, *child);
            }
        }
        self.features[id.0].parent = None;

        self.constraints.retain(|constraint| {
            removed.binary_search(&constraint.first).is_err()
                && removed.binary_search(&constraint.second).is_err()
        });

        let mut group_created = false;
        match self[parent].children.len() {
            0 => {
                self.features[parent.0].group_type_cardinality = Cardinality::empty();
                self.features[parent.0].group_instance_cardinality = Cardinality::empty();
            }
            1 => self.derive_group_cards_for_one_child(parent),
            2 if former_child_count < 2 => {
                self.derive_group_cards_for_children(parent);
                group_created = true;
            }
            _ => {}
        }
        Ok(group_created)
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ModelError> {
        self.check_id(constraint.first)?;
        self.check_id(constraint.second)?;
        self.constraints.push(constraint);
        Ok(())
    }

    pub fn remove_constraint(&mut self, index: usize) {
        if index < self.constraints.len() {
            self.constraints.remove(index);
        }
    }

    /// Group type is `[0, 1]` or `[1, 1]` depending on whether the child can
    /// have zero instances; group instance mirrors the child's instance
    /// cardinality.
    fn derive_group_cards_for_one_child(&mut self, parent: FeatureId) {
        let child = self[parent].children[0];
        let child_card = self[child].instance_cardinality.clone();
        let lower = if child_card.admits_zero() { 0 } else { 1 };
        self.features[parent.0].group_type_cardinality = Cardinality::single(lower, Some(1));
        self.features[parent.0].group_instance_cardinality = child_card;
    }

    /// Group type is `[mandatory children, all children]`; group instance is
    /// the sum of the children's tightest bounds, unbounded if any child is.
    fn derive_group_cards_for_children(&mut self, parent: FeatureId) {
        let cards: Vec<Cardinality> = self[parent]
            .children
            .iter()
            .map(|&child| self[child].instance_cardinality.clone())
            .collect();

        let mandatory = cards.iter().filter(|card| !card.admits_zero()).count() as u64;
        let total = cards.len() as u64;

        let lower_instance: u64 = cards.iter().filter_map(Cardinality::min_lower).sum();
        let upper_instance = if cards.iter().any(|card| card.max_upper() == Some(None)) {
            None
        } else {
            Some(
                cards
                    .iter()
                    .filter_map(|card| card.max_upper().flatten())
                    .sum(),
            )
        };

        self.features[parent.0].group_type_cardinality =
            Cardinality::single(mandatory, Some(total));
        self.features[parent.0].group_instance_cardinality =
            Cardinality::new(vec![Interval::new(lower_instance, upper_instance)]);
    }
}

impl Index<FeatureId> for FeatureModel {
    type Output = Feature;

    fn index(&self, id: FeatureId) -> &Feature {
        &self.features[id.0]
    }
}
