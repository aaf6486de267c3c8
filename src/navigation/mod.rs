//! Derived previous/next pointers over the active subset of a collection.
//!
//! Links are a pure function of the active items and their `order`, recomputed
//! wholesale after every mutation. They are advisory: a failed write leaves a
//! stale pointer that the next successful pass overwrites.
mod linker;
mod relink;

pub use linker::{compute_links, relink, walk_chain};
pub use relink::{relink_collection, LinkRecomputeError, RelinkReport};
