//! Admin request handlers
//!
//! Thin wrappers over [`Site`]: each request runs one operation to
//! completion and renders the result, or the error, as a page.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::content::Post;
use crate::error::{Error, ErrorKind};
use crate::templates::{
    AdminEditPage, AdminEntry, AdminListPage, ADMIN_EDIT_TEMPLATE, ADMIN_LIST_TEMPLATE,
};
use crate::Site;

#[derive(Debug, Deserialize)]
pub struct NewPostForm {
    #[serde(rename = "new-post-name")]
    title: String,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    content: String,
}

impl From<EditForm> for Post {
    fn from(form: EditForm) -> Self {
        Post {
            title: form.title,
            author: form.author,
            date: form.date,
            // Browsers submit textareas with CRLF line endings
            content: form.content.replace("\r\n", "\n"),
        }
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Format => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Io | ErrorKind::Template => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (status_for(self.kind()), format!("error: {}", self)).into_response()
    }
}

/// GET /_admin/
pub async fn list(State(site): State<Arc<Site>>) -> Response {
    render_list(&site, None)
}

/// POST /_admin/new
pub async fn create(State(site): State<Arc<Site>>, Form(form): Form<NewPostForm>) -> Response {
    match site.new_post(&form.title) {
        Ok(name) => Redirect::to(&format!("/_admin/edit/{}", name)).into_response(),
        Err(e) => {
            tracing::warn!("Failed to create post {:?}: {}", form.title, e);
            render_list(&site, Some(e))
        }
    }
}

/// GET /_admin/edit/:name
pub async fn edit(State(site): State<Arc<Site>>, Path(name): Path<String>) -> Response {
    match site.get_post(&name) {
        Ok((post, _)) => render_edit(&site, &name, &post, None),
        // Show the raw file so a post that no longer decodes can be repaired
        Err(e) if e.kind() == ErrorKind::Format => match site.get_source(&name) {
            Ok(source) => {
                let post = Post {
                    content: source,
                    ..Post::default()
                };
                render_edit(&site, &name, &post, Some(e))
            }
            Err(e) => e.into_response(),
        },
        Err(e) => e.into_response(),
    }
}

/// POST /_admin/edit/:name
pub async fn save(
    State(site): State<Arc<Site>>,
    Path(name): Path<String>,
    Form(form): Form<EditForm>,
) -> Response {
    let post = Post::from(form);
    match site.save_post(&name, post.clone()) {
        Ok(_) => Redirect::to(&format!("/_admin/edit/{}", name)).into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => e.into_response(),
        Err(e) => {
            tracing::warn!("Failed to save post {}: {}", name, e);
            render_edit(&site, &name, &post, Some(e))
        }
    }
}

/// POST /_admin/delete/:name
pub async fn delete(State(site): State<Arc<Site>>, Path(name): Path<String>) -> Response {
    match site.delete_post(&name) {
        Ok(()) => Redirect::to("/_admin/").into_response(),
        Err(e) => {
            tracing::warn!("Failed to delete post {}: {}", name, e);
            render_list(&site, Some(e))
        }
    }
}

/// POST /_admin/build
pub async fn build(State(site): State<Arc<Site>>) -> Response {
    match site.generate() {
        Ok(built) => {
            tracing::info!("Rebuilt {} posts from admin", built.len());
            Redirect::to("/_admin/").into_response()
        }
        Err(e) => {
            tracing::warn!("Build failed: {}", e);
            render_list(&site, Some(e))
        }
    }
}

/// Render the post listing, optionally with an error banner. The response
/// status follows the error.
fn render_list(site: &Site, error: Option<Error>) -> Response {
    let status = error
        .as_ref()
        .map_or(StatusCode::OK, |e| status_for(e.kind()));

    let entries = match site.list_posts() {
        Ok(entries) => entries,
        Err(e) => return e.into_response(),
    };

    let posts: Vec<AdminEntry> = entries
        .into_iter()
        .map(|entry| {
            let publish = entry.metadata.summary();
            match entry.post {
                Ok(post) => AdminEntry {
                    name: entry.name,
                    title: post.title,
                    date: post.date,
                    publish,
                    error: None,
                },
                Err(e) => AdminEntry {
                    name: entry.name,
                    title: String::new(),
                    date: String::new(),
                    publish,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    let page = AdminListPage {
        site_title: &site.config.title,
        posts: &posts,
        error: error.map(|e| e.to_string()),
    };
    match site.generator().templates().render(ADMIN_LIST_TEMPLATE, &page) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Render the edit form for `post`, which may hold unsaved changes
fn render_edit(site: &Site, name: &str, post: &Post, error: Option<Error>) -> Response {
    let status = error
        .as_ref()
        .map_or(StatusCode::OK, |e| status_for(e.kind()));

    let metadata = match site.generator().publish_state(name) {
        Ok(metadata) => metadata,
        Err(e) => return e.into_response(),
    };

    let page = AdminEditPage {
        site_title: &site.config.title,
        name,
        post,
        publish: metadata.summary(),
        error: error.map(|e| e.to_string()),
    };
    match site.generator().templates().render(ADMIN_EDIT_TEMPLATE, &page) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => e.into_response(),
    }
}
