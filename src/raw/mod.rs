mod arena;
mod handle;
mod node;
mod raw_sbtree_map;
mod size;

pub(crate) use handle::{Handle, NodeRef};
pub(crate) use raw_sbtree_map::RawSbTreeMap;
