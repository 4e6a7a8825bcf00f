//! rstree: labeled, ordered in-memory trees addressed by `/a/b/c` paths.
//!
//! Layers:
//! - `domain`: the tree, node cursors, path handling, rendering
//! - `application`: tag listings and the demo namespace
//! - `config`: layered settings
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    IdSource, Index, LabelTree, NodeMut, NodeRef, RandomIds, SequentialIds, TreeError, TreeNode,
    TreeOptions, TreeResult,
};
