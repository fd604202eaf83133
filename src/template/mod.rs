//! # Templates
//!
//! Label templates as served by the gateway, and filtering of the template
//! list by free-text search and tags.
//!
//! ## Modules
//!
//! - [`schema`]: template, variable, and target types
//! - [`filter`]: search / tag filtering

pub mod filter;
pub mod schema;

pub use filter::{TemplateFilter, all_tags};
pub use schema::{TemplateDetail, TemplateSummary, VariableSpec};
