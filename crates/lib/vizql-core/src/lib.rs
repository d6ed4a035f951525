//! Core types and services for vizql-mcp.
//!
//! This crate owns the outbound payload builders for Tableau's `VizQL` Data
//! Service, the metadata field-catalog request and its response validation,
//! and the single-shot HTTP relay both bridge operations go through.

pub mod bridge;
pub mod config;
pub mod error;
pub mod metadata;
pub mod query;
pub mod relay;
