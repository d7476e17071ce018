#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! schemaprobe - catalog enumeration over constrained query channels
//!
//! schemaprobe discovers the users, databases, tables and columns of a
//! target database when all it has is a channel that runs one composed
//! query at a time. Each enumeration level is expressed as a query
//! template, wrapped as a uniquely aliased derived table, and pulled out
//! with the best extraction strategy the channel supports: multi-row
//! "direct" techniques first, then the one-value-at-a-time inferential
//! fallback. Everything discovered is memoized for the session.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | Command-line binary | All above + `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`identifier`]**: safe/unsafe identifier forms and string literals
//! - **[`dialect`]**: per-level query templates and type-code tables
//! - **[`extract`]**: extraction seams (`RowExtractor`, `AdministratorProbe`),
//!   technique selection and the pivot executor
//! - **[`database`]**: SQLite target access and the session catalog cache
//! - **[`lens`]**: the enumeration lens and output helpers
//! - **[`config`]**: configuration management
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use schemaprobe::database::{DatabaseConn, SqliteExtractor};
//! use schemaprobe::dialect::Dialect;
//! use schemaprobe::extract::{Technique, TechniqueSelector};
//! use schemaprobe::lens::enumerate::{CatalogLens, EnumerationScope};
//!
//! let extractor = SqliteExtractor::new(DatabaseConn::open_path("inventory.db")?);
//! let dialect = Dialect::sqlite();
//! let selector = TechniqueSelector::new([Technique::Union]);
//! let mut lens = CatalogLens::new(&extractor, &dialect, selector);
//!
//! for db in lens.get_databases()? {
//!     println!("{}", db);
//! }
//! let columns = lens.get_columns(&EnumerationScope::new().with_db("main"))?;
//! ```

pub mod config;
pub mod database;
pub mod dialect;
pub mod error;
pub mod extract;
pub mod identifier;
pub mod lens;

// =============================================================================
// Configuration
// =============================================================================

pub use config::ProbeConfig;

// =============================================================================
// Errors
// =============================================================================

pub use error::{EnumerationError, EnumerationResult, ExtractionError};

// =============================================================================
// Extraction and dialects
// =============================================================================

pub use dialect::{Dialect, Level, QueryTemplates, TypeCodeLookup};
pub use extract::{
    AdministratorProbe, PivotExecutor, Row, RowExtractor, ScalarValue, Strategy, Technique,
    TechniqueSelector, TemplateAdminProbe,
};

// =============================================================================
// Storage
// =============================================================================

pub use database::{CacheLevel, CatalogCache, CatalogSnapshot, DatabaseConn, SqliteExtractor};

// =============================================================================
// Lens
// =============================================================================

pub use lens::enumerate::{CatalogLens, EnumerationScope};
pub use lens::utils::OutputFormat;
