//! Page templates using the Tera template engine
//!
//! Default templates are embedded in the binary. A site may override any of
//! them by placing a file with the same name in its template directory.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

use crate::content::{Post, PublishSummary};
use crate::error::{Error, Result};

pub const POST_TEMPLATE: &str = "post.html";
pub const INDEX_TEMPLATE: &str = "index.html";
pub const ADMIN_LIST_TEMPLATE: &str = "admin/list.html";
pub const ADMIN_EDIT_TEMPLATE: &str = "admin/edit.html";

const DEFAULT_TEMPLATES: [(&str, &str); 5] = [
    ("layout.html", include_str!("default/layout.html")),
    (POST_TEMPLATE, include_str!("default/post.html")),
    (INDEX_TEMPLATE, include_str!("default/index.html")),
    (ADMIN_LIST_TEMPLATE, include_str!("default/admin/list.html")),
    (ADMIN_EDIT_TEMPLATE, include_str!("default/admin/edit.html")),
];

/// Template renderer
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer with only the embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(DEFAULT_TEMPLATES)?;
        Ok(Self { tera })
    }

    /// Create a renderer, letting files in `template_dir` replace the
    /// embedded templates of the same name
    pub fn with_overrides(template_dir: &Path) -> Result<Self> {
        let mut renderer = Self::new()?;

        for (name, _) in DEFAULT_TEMPLATES {
            let path = template_dir.join(name);
            if !path.is_file() {
                continue;
            }
            let source = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            renderer.tera.add_raw_template(name, &source)?;
            tracing::debug!("Using template override {:?}", path);
        }

        Ok(renderer)
    }

    /// Render a template with the given data
    pub fn render<T: Serialize>(&self, template_name: &str, data: &T) -> Result<String> {
        let context = Context::from_serialize(data)?;
        Ok(self.tera.render(template_name, &context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct PostPage<'a> {
    pub site_title: &'a str,
    pub title: &'a str,
    pub author: &'a str,
    pub date: &'a str,
    /// Rendered HTML body
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexPage<'a> {
    pub site_title: &'a str,
    pub posts: Vec<IndexEntry<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry<'a> {
    /// Output file name, e.g. `hello.html`
    pub file: &'a str,
    pub title: &'a str,
    pub author: &'a str,
    pub date: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminListPage<'a> {
    pub site_title: &'a str,
    pub posts: &'a [AdminEntry],
    pub error: Option<String>,
}

/// One row of the admin listing. A post that fails to decode still gets a
/// row, carrying the error instead of its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct AdminEntry {
    pub name: String,
    pub title: String,
    pub date: String,
    pub publish: PublishSummary,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminEditPage<'a> {
    pub site_title: &'a str,
    pub name: &'a str,
    pub post: &'a Post,
    pub publish: PublishSummary,
    pub error: Option<String>,
}
