//! Publish state derived from source and output modification times

use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::post::{output_file, source_file};
use crate::error::{Error, Result};
use crate::store::PostStore;

/// Timestamps of a post's source and rendered artifact.
///
/// Never stored; recomputed from the stores on every read. Note that a
/// touched source counts as an edit, since only mtimes are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostMetadata {
    pub last_updated: SystemTime,
    /// `None` until the post has been rendered at least once
    pub published_at: Option<SystemTime>,
}

impl PostMetadata {
    pub fn derive(raw_modified: SystemTime, build_modified: Option<SystemTime>) -> Self {
        Self {
            last_updated: raw_modified,
            published_at: build_modified,
        }
    }

    /// True iff the output exists and the source was last changed strictly
    /// before it
    pub fn is_published_up_to_date(&self) -> bool {
        matches!(self.published_at, Some(published) if self.last_updated < published)
    }

    /// True iff there is no output yet, or the source is newer than it.
    ///
    /// Equal timestamps are neither stale nor up to date.
    pub fn is_stale(&self) -> bool {
        match self.published_at {
            None => true,
            Some(published) => self.last_updated > published,
        }
    }

    /// Display form used by templates and the CLI listing
    pub fn summary(&self) -> PublishSummary {
        let status = if self.published_at.is_none() {
            "unpublished"
        } else if self.is_published_up_to_date() {
            "published"
        } else {
            "stale"
        };

        PublishSummary {
            status,
            last_updated: format_time(self.last_updated),
            published_at: self.published_at.map(format_time),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishSummary {
    pub status: &'static str,
    pub last_updated: String,
    pub published_at: Option<String>,
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Look up the publish state of post `name` in the two stores.
///
/// A missing source is [`Error::NotFound`]; a missing output just means the
/// post is unpublished.
pub fn publish_state(raw: &dyn PostStore, build: &dyn PostStore, name: &str) -> Result<PostMetadata> {
    let source = source_file(name);
    let raw_modified = raw
        .modified(&source)?
        .ok_or_else(|| Error::NotFound(source.clone()))?;
    let build_modified = build.modified(&output_file(name))?;

    Ok(PostMetadata::derive(raw_modified, build_modified))
}
