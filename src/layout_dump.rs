use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::layout::{ExpandedState, Point};
use crate::model::{FeatureId, FeatureModel};

/// Serializable snapshot of a computed layout, for the CLI and for
/// comparing layouts in tests and debugging sessions.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub root: String,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub constraints: Vec<ConstraintDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: usize,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub instance_cardinality: String,
    pub group_type_cardinality: String,
    pub group_instance_cardinality: String,
    pub collapsed: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Serialize)]
pub struct ConstraintDump {
    pub kind: String,
    pub first: String,
    pub second: String,
}

impl LayoutDump {
    pub fn from_positions(
        model: &FeatureModel,
        expanded: &ExpandedState,
        positions: &HashMap<FeatureId, Point>,
    ) -> Self {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for id in model.iter() {
            let Some(point) = positions.get(&id) else {
                continue;
            };
            let feature = &model[id];
            nodes.push(NodeDump {
                id: id.index(),
                name: feature.name.clone(),
                x: point.x,
                y: point.y,
                instance_cardinality: feature.instance_cardinality.to_display_str("<", ">"),
                group_type_cardinality: feature.group_type_cardinality.to_display_str("[", "]"),
                group_instance_cardinality: feature
                    .group_instance_cardinality
                    .to_display_str("[", "]"),
                collapsed: !expanded.is_expanded(id),
            });
            if let Some(parent) = feature.parent
                && positions.contains_key(&parent)
            {
                edges.push(EdgeDump {
                    from: parent.index(),
                    to: id.index(),
                });
            }
        }

        let constraints = model
            .constraints
            .iter()
            .map(|constraint| ConstraintDump {
                kind: if constraint.require {
                    "requires".to_string()
                } else {
                    "excludes".to_string()
                },
                first: model[constraint.first].name.clone(),
                second: model[constraint.second].name.clone(),
            })
            .collect();

        LayoutDump {
            root: model[model.root()].name.clone(),
            nodes,
            edges,
            constraints,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    model: &FeatureModel,
    expanded: &ExpandedState,
    positions: &HashMap<FeatureId, Point>,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_positions(model, expanded, positions);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
