//! # querypad
//!
//! A terminal SQL query pad: connection sidebar, a SQL editor with live
//! syntax highlighting, and a filterable results grid, driven by sample
//! data. The highlighter lives in [`highlight`] and has no UI dependencies.

pub mod app;
pub mod connection;
pub mod db;
pub mod error;
pub mod highlight;
pub mod output;

pub use error::{Error, Result};
