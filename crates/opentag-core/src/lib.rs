//! Core types and analytics for the opentag registry browser.
//!
//! This crate is deliberately free of I/O, HTTP, and terminal dependencies.
//! All other crates depend on it; every view in the application is a pure
//! function of the loaded registry plus local selection state.

pub mod aggregate;
pub mod compare;
pub mod entity;
pub mod error;
pub mod group;
pub mod pattern;
pub mod query;
pub mod tag;

pub use error::{Error, Result};
