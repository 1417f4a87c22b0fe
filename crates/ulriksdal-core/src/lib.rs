#![forbid(unsafe_code)]

//! Core types for the Ulriksdal algorithm registry.

pub mod algorithm;
pub mod error;
pub mod ns;

pub use error::{Error, Result};
