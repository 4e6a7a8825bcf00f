//! Application layer: use cases on top of the tree
//!
//! This layer orchestrates domain logic and owns file input.

pub mod demo;
pub mod error;
pub mod error_ext;
pub mod tagfile;

pub use demo::{pressure_plant, Quality, TagValue};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use tagfile::{to_listing, TagLoader};
