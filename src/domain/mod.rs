//! Domain layer: the labeled tree and its path algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod ids;
pub mod node;
pub mod path;
pub mod render;

pub use arena::{LabelTree, TreeIterator, TreeNode, TreeOptions};
pub use error::{TreeError, TreeResult};
pub use generational_arena::Index;
pub use ids::{IdSource, RandomIds, SequentialIds};
pub use node::{NodeMut, NodeRef};
pub use path::{join_path, split_path, ROOT_LABEL, SEPARATOR};
