//! pgschema core - dump segmentation, classification, and split output.
//!
//! The pipeline is linear: a schema-only dump streams out of `pg_dump`,
//! [`segment::Segments`] cuts it into statements, [`classify`] decides where
//! each statement belongs, and [`split::Splitter`] writes the per-schema
//! files plus a metadata record describing the run.

pub mod classify;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod segment;
pub mod split;
pub mod tool;

pub use classify::{classify, schema_of, Classified, ObjectKind, UtilityKind};
pub use error::Error;
pub use layout::{sanitize_name, Layout, SplitWriter, OTHERS_SCHEMA, SCHEMA_DIR};
pub use metadata::{DumpMetadata, METADATA_FILE};
pub use segment::Segments;
pub use split::{SplitReport, Splitter};
pub use tool::{
    pg_dump_version, server_version, ConnectionParams, FunctionSource, NoFunctionSource,
    PsqlFunctionSource, SchemaDump, APPLICATION_NAME,
};
