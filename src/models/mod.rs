//! Typed helpers for request bodies.
//!
//! Services accept and return [`serde_json::Value`]; these types build
//! the bodies that have a fixed shape.
//!
//! - [`schema`] - dataset column types and schema inference

pub mod schema;

pub use schema::{Column, ColumnType, Schema};
