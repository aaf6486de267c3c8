//! Helpers shared by the storage backends.
pub mod frontmatter;
