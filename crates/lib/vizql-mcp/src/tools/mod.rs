//! MCP tool modules.
//!
//! Tools are grouped by domain: query execution against the data service,
//! field-catalog lookup through the Metadata API, and contextual examples
//! for composing query fragments.

pub mod data;
pub mod metadata;
mod context;
