//! Custom analytics over the collaboration graph

pub mod distance;
pub mod pagerank;

pub use distance::{collaboration_distances, DistanceTable};
pub use pagerank::{page_rank, PageRankConfig, RankTable};
