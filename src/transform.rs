//! End-to-end transformation: statements in, UPPAAL XML out.
//!
//! Every run owns a fresh [`ModelBuilder`], so runs on different threads
//! never share naming counters or templates.
//!
//! # Example
//!
//! ```no_run
//! use nta_builder::{transform_file, TransformConfig};
//! use std::path::Path;
//!
//! let config = TransformConfig::builder()
//!     .output("out/counter")
//!     .template_name("Counter")
//!     .build()?;
//!
//! let outcome = transform_file(&config, Path::new("traces/counter.ndjson"))?;
//! println!("wrote {}", outcome.xml_path.display());
//! # Ok::<(), nta_builder::Error>(())
//! ```

use crate::builder::ModelBuilder;
use crate::error::NtaResult;
use crate::serialize::write_xml_file;
use crate::traverser::{load_statements, SequentialTraverser, Statement, Traverser};
use crate::util::impl_builder;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use tracing::info;

/// Configuration for one transformation run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct TransformConfig {
    /// Output path without extension; `.xml` is appended.
    pub output: PathBuf,

    /// Name of the NTA (default: "nta").
    pub nta_name: String,

    /// Name of the single generated template (default: "Process").
    pub template_name: String,

    /// Prefix for generated location names (default: empty, giving `Location_N`).
    pub location_prefix: String,

    /// Also write a JSON snapshot of the model (`.uppaal`) next to the XML.
    pub snapshot: bool,

    /// Comment attached to the initial location (optional).
    pub initial_comment: Option<String>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::new(),
            nta_name: "nta".into(),
            template_name: "Process".into(),
            location_prefix: String::new(),
            snapshot: false,
            initial_comment: None,
        }
    }
}

impl_builder!(TransformConfig, TransformConfigBuilder {
    required { output: PathBuf }
    optional {
        nta_name: String,
        template_name: String,
        location_prefix: String,
        snapshot: bool,
    }
    optional_or { initial_comment: String }
});

impl From<PathBuf> for TransformConfig {
    fn from(output: PathBuf) -> Self {
        Self {
            output,
            ..Default::default()
        }
    }
}

impl From<&str> for TransformConfig {
    fn from(output: &str) -> Self {
        Self {
            output: PathBuf::from(output),
            ..Default::default()
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TransformOutcome {
    pub xml_path: PathBuf,
    pub snapshot_path: Option<PathBuf>,
    pub locations: usize,
    pub edges: usize,
}

/// Build the automaton for `statements` with a [`SequentialTraverser`] and
/// write it out.
pub fn run_transformation(config: &TransformConfig, statements: &[Statement]) -> NtaResult<TransformOutcome> {
    let mut traverser = SequentialTraverser::new(config.template_name.as_str())
        .location_prefix(config.location_prefix.as_str())
        .initial_comment(config.initial_comment.clone());
    run_with(config, &mut traverser, statements)
}

/// Like [`run_transformation`], with a caller-supplied traverser.
pub fn run_with(
    config: &TransformConfig,
    traverser: &mut impl Traverser,
    statements: &[Statement],
) -> NtaResult<TransformOutcome> {
    info!(
        output = %config.output.display(),
        statements = statements.len(),
        "Running transformation"
    );

    let mut builder = ModelBuilder::new();
    builder.new_automaton(config.nta_name.as_str());
    traverser.run(&mut builder, statements)?;
    let nta = builder.finalize_model()?;

    let xml_path = write_xml_file(nta, &config.output)?;
    let snapshot_path = if config.snapshot {
        write_snapshot(nta, &xml_path)?
    } else {
        None
    };

    info!(path = %xml_path.display(), "Transformation was finished");
    Ok(TransformOutcome {
        xml_path,
        snapshot_path,
        locations: nta.location_count(),
        edges: nta.edge_count(),
    })
}

#[cfg(feature = "snapshot")]
fn write_snapshot(nta: &crate::model::Nta, xml_path: &Path) -> NtaResult<Option<PathBuf>> {
    crate::snapshot::save_model_snapshot(nta, xml_path).map(Some)
}

#[cfg(not(feature = "snapshot"))]
fn write_snapshot(_nta: &crate::model::Nta, xml_path: &Path) -> NtaResult<Option<PathBuf>> {
    tracing::warn!(path = %xml_path.display(), "Snapshot requested but the `snapshot` feature is disabled");
    Ok(None)
}

/// Load an NDJSON statement trace from `input` and transform it.
pub fn transform_file(config: &TransformConfig, input: &Path) -> NtaResult<TransformOutcome> {
    let statements = load_statements(input)?;
    run_transformation(config, &statements)
}

/// Run [`transform_file`] on a background thread.
///
/// The join handle yields the terminal success or failure of the run.
pub fn spawn_transformation(config: TransformConfig, input: PathBuf) -> std::io::Result<JoinHandle<NtaResult<TransformOutcome>>> {
    std::thread::Builder::new()
        .name("nta-transform".into())
        .spawn(move || transform_file(&config, &input))
}
