//! Distributed-object graph model.
//!
//! A distributed object is an entry-point file plus every file reachable
//! from it by following resolved links. Only files with the [`Distributed`]
//! capability have outbound links.

pub mod file;
pub mod graph;
pub mod link;

pub use file::{DataFile, Distributed, DistributedFile, FileAttrs};
pub use graph::FileGraph;
pub use link::{Link, LinkTable};
