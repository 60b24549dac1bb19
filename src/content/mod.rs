//! Content module - the post model, its on-disk format and publish state

mod markdown;
pub mod metadata;
pub mod post;
mod publish;

pub use markdown::MarkdownRenderer;
pub use post::{derive_name, is_valid_name, Post};
pub use publish::{publish_state, PostMetadata, PublishSummary};
