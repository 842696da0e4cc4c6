//! nta-builder: turn sequential statement traces into UPPAAL timed automata.
//!
//! The crate has three layers:
//!
//! 1. **Model** ([`model`]): a network of timed automata (NTA) holding global
//!    declarations and templates. Templates, locations and edges live in
//!    arenas and refer to each other through typed ids.
//!
//! 2. **Build context** ([`ModelBuilder`]): the only way to grow a model.
//!    Generates unique location names, keeps every edge inside its template
//!    and reports misused handles as [`BuildError`]s instead of ignoring them.
//!
//! 3. **Serializer** ([`serialize`](mod@serialize)): renders a finished model
//!    into the flat-system XML format that UPPAAL loads.
//!
//! A [`Traverser`] sits on top and drives the builder from a statement trace;
//! [`run_transformation`] wires the whole pipeline to an output file.
//!
//! # Quick Start
//!
//! ```
//! use nta_builder::{serialize_to_string, ModelBuilder, SequentialTraverser, Statement, Traverser};
//!
//! let mut builder = ModelBuilder::new();
//! builder.new_automaton("counter");
//!
//! let statements = [
//!     Statement::GlobalDeclaration { expr: "int x = 0;".into() },
//!     Statement::test("x < 10"),
//!     Statement::update("x := x + 1"),
//! ];
//! SequentialTraverser::new("Counter").run(&mut builder, &statements)?;
//!
//! let xml = serialize_to_string(builder.finalize_model()?)?;
//! assert!(xml.contains("Process1 =  Counter();"));
//! # Ok::<(), nta_builder::Error>(())
//! ```

pub mod builder;
pub mod error;
pub mod model;
pub mod serialize;
#[cfg(feature = "snapshot")]
pub mod snapshot;
pub mod transform;
pub mod traverser;
mod util;

// Re-export core types for convenience
pub use builder::ModelBuilder;
pub use error::{BuildError, Error, NtaResult, StatementError};
pub use model::{Edge, EdgeId, Expression, Location, LocationId, Nta, Template, TemplateId};
pub use serialize::{save_to_xml, serialize, serialize_to_string, write_xml_file};
#[cfg(feature = "snapshot")]
pub use snapshot::save_model_snapshot;
pub use transform::{
    run_transformation, run_with, spawn_transformation, transform_file, TransformConfig,
    TransformConfigBuilder, TransformOutcome,
};
pub use traverser::{load_statements, parse_statements, SequentialTraverser, Statement, Traverser};
pub use util::with_appended_extension;
