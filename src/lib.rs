pub mod cardinality;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod text_metrics;
pub mod undo;

pub use cardinality::{Cardinality, CardinalityError, Interval};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use layout::{ExpandedState, LayoutEngine, Point, compute_layout};
pub use model::{Constraint, Feature, FeatureId, FeatureModel, ModelError, RemovalPolicy};
pub use text_metrics::{CharCountEstimator, FontMetricsEstimator, NodeWidthEstimator};
pub use undo::UndoRedoManager;
