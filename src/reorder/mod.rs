//! Applies caller-supplied rankings to a collection.
mod apply;
mod types;

pub use apply::{plan_reorder, reorder, ReorderPlan};
pub use types::{RankEntry, Ranking, ReorderReport};

#[cfg(test)]
#[path = "reorder_tests.rs"]
mod reorder_tests;
