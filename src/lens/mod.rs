//! Lens module
//!
//! This module provides high-level "lens" abstractions that combine
//! enumeration logic with output formatting. Lenses are reusable across
//! interfaces (CLI, library callers).
//!
//! # Architecture
//!
//! Each lens module exports:
//! - A **Lens struct** (`CatalogLens`) - the main entry point for all operations
//! - **Args structs** - input arguments for lens methods (`EnumerationScope`)
//! - **Output types** - flat row types for table rendering (feature `display`)
//!
//! ```rust,ignore
//! use schemaprobe::lens::enumerate::{CatalogLens, EnumerationScope};
//! use schemaprobe::lens::utils::OutputFormat;
//! ```

pub mod enumerate;
pub mod utils;
