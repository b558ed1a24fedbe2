//! Graph representation and algorithms module

pub mod collab;
pub mod builder;
pub mod algorithms;

pub use builder::{build_collaboration_graph, GraphBuilder};
pub use collab::{AuthorNode, CollaborationGraph, GraphSnapshot};
