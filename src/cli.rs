use crate::config::load_config;
use crate::layout::{ExpandedState, compute_layout};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::model::FeatureModel;
use crate::text_metrics::{CharCountEstimator, FontMetricsEstimator, NodeWidthEstimator};
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "cfmed",
    version,
    about = "Feature model layout: computes node positions for a CFM tree"
)]
pub struct Args {
    /// Input feature model JSON or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output layout dump JSON. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file (layout spacing overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Features to collapse before the layout is computed, by name
    #[arg(long = "collapse")]
    pub collapse: Vec<String>,

    /// Measure labels with system font metrics instead of the
    /// character-count heuristic
    #[arg(long = "fontMetrics")]
    pub font_metrics: bool,

    /// Font size used with --fontMetrics
    #[arg(long = "fontSize", default_value_t = 12.0)]
    pub font_size: f32,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let model: FeatureModel = serde_json::from_str(&input)?;

    let mut expanded = ExpandedState::initialize(&model);
    for name in &args.collapse {
        let id = model
            .feature_by_name(name)
            .ok_or_else(|| anyhow::anyhow!("No feature named `{name}` in the model"))?;
        expanded.collapse(id);
    }

    let heuristic = CharCountEstimator::new(config.layout.scale_text);
    let estimator: Box<dyn NodeWidthEstimator> = if args.font_metrics {
        Box::new(FontMetricsEstimator::new(args.font_size, heuristic))
    } else {
        Box::new(heuristic)
    };

    let positions = compute_layout(&model, &expanded, &config.layout, estimator.as_ref());

    match args.output.as_deref() {
        Some(path) => write_layout_dump(path, &model, &expanded, &positions)?,
        None => {
            let dump = LayoutDump::from_positions(&model, &expanded, &positions);
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
