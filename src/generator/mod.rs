//! Generator module - the build pipeline from raw posts to rendered HTML
//!
//! Every operation reads and writes through the two [`PostStore`]s. The
//! filename relation `name.md` -> `name.html` is the only link between them.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{IndexConfig, SiteConfig};
use crate::content::metadata::{decode, encode};
use crate::content::post::{name_of_source, output_file, source_file};
use crate::content::{derive_name, publish_state, MarkdownRenderer, Post, PostMetadata};
use crate::error::{Error, FormatError, Result, Stage};
use crate::store::PostStore;
use crate::templates::{
    IndexEntry, IndexPage, PostPage, TemplateRenderer, INDEX_TEMPLATE, POST_TEMPLATE,
};

/// Output name of the post listing
pub const INDEX_FILE: &str = "index.html";

/// Builds posts from the raw store into the build store
pub struct Generator {
    raw: Arc<dyn PostStore>,
    build: Arc<dyn PostStore>,
    markdown: MarkdownRenderer,
    templates: TemplateRenderer,
    site_title: String,
    default_author: String,
    index: IndexConfig,
}

impl Generator {
    /// Create a new generator
    pub fn new(
        config: &SiteConfig,
        raw: Arc<dyn PostStore>,
        build: Arc<dyn PostStore>,
        templates: TemplateRenderer,
    ) -> Self {
        Self {
            raw,
            build,
            markdown: MarkdownRenderer::with_options(&config.highlight),
            templates,
            site_title: config.title.clone(),
            default_author: config.author.clone(),
            index: config.index.clone(),
        }
    }

    pub fn templates(&self) -> &TemplateRenderer {
        &self.templates
    }

    /// Names of all posts in the raw store, in listing order
    pub fn post_names(&self) -> Result<Vec<String>> {
        Ok(self
            .raw
            .list()?
            .iter()
            .filter_map(|file| name_of_source(file))
            .map(str::to_string)
            .collect())
    }

    /// Build every post, then the index.
    ///
    /// Stops at the first failing post: later posts are not attempted and
    /// the index is not written.
    pub fn build_all(&self) -> Result<Vec<(String, Post)>> {
        let start = Instant::now();
        let mut built = Vec::new();

        for name in self.post_names()? {
            let (post, _) = self.build_post(&name)?;
            built.push((output_file(&name), post));
        }

        if self.index.enable {
            self.write_index(&built)?;
        }

        tracing::info!(
            "Built {} posts in {:.2}s",
            built.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(built)
    }

    /// Build a single post and return its rendered page. Does not touch the
    /// index.
    pub fn build_one(&self, name: &str) -> Result<String> {
        let (_, html) = self.build_post(name)?;
        Ok(html)
    }

    /// Rebuild the index from the current raw store without re-rendering
    /// any post. A no-op when the index is disabled.
    pub fn refresh_index(&self) -> Result<()> {
        if !self.index.enable {
            return Ok(());
        }

        let mut posts = Vec::new();
        for name in self.post_names()? {
            let source = source_file(&name);
            let raw = self.raw.read(&source).map_err(|e| e.at(&source, Stage::Read))?;
            let post = decode(&raw).map_err(|e| Error::from(e).at(&source, Stage::Decode))?;
            posts.push((output_file(&name), post));
        }

        self.write_index(&posts)
    }

    /// Remove a post's source and its rendered page. Either may already be
    /// missing.
    pub fn delete(&self, name: &str) -> Result<()> {
        self.raw.remove(&source_file(name))?;
        self.build.remove(&output_file(name))?;
        tracing::debug!("Deleted post {}", name);
        Ok(())
    }

    /// Create an empty post dated today, named after its title
    pub fn create(&self, title: &str) -> Result<Post> {
        let name = derive_name(title.trim());
        if name.is_empty() {
            return Err(FormatError::InvalidValue { key: "Title" }.into());
        }

        let source = source_file(&name);
        if self.raw.exists(&source)? {
            return Err(Error::Conflict(name));
        }

        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let post = Post::new(title, self.default_author.as_str(), today).normalized()?;
        self.raw.write(&source, &encode(&post))?;

        tracing::debug!("Created post {}", source);
        Ok(post)
    }

    /// Read and decode a post together with its publish state
    pub fn load(&self, name: &str) -> Result<(Post, PostMetadata)> {
        let raw = self.raw.read(&source_file(name))?;
        let post = decode(&raw)?;
        let metadata = self.publish_state(name)?;
        Ok((post, metadata))
    }

    /// The stored file as text, for repairing a post that no longer decodes
    pub fn source(&self, name: &str) -> Result<String> {
        let raw = self.raw.read(&source_file(name))?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Replace an existing post. Returns the post as stored, with its
    /// metadata values trimmed.
    pub fn save(&self, name: &str, post: Post) -> Result<Post> {
        let source = source_file(name);
        if !self.raw.exists(&source)? {
            return Err(Error::NotFound(source));
        }

        let post = post.normalized()?;
        self.raw.write(&source, &encode(&post))?;
        Ok(post)
    }

    pub fn publish_state(&self, name: &str) -> Result<PostMetadata> {
        publish_state(self.raw.as_ref(), self.build.as_ref(), name)
    }

    /// read -> decode -> render -> template -> write, each failure tagged
    /// with the post's source file and the stage
    fn build_post(&self, name: &str) -> Result<(Post, String)> {
        let source = source_file(name);
        tracing::debug!("Building {}", source);

        let raw = self.raw.read(&source).map_err(|e| e.at(&source, Stage::Read))?;
        let post = decode(&raw).map_err(|e| Error::from(e).at(&source, Stage::Decode))?;

        let content = self.markdown.render(&post.content);
        let page = PostPage {
            site_title: &self.site_title,
            title: &post.title,
            author: &post.author,
            date: &post.date,
            content: &content,
        };
        let html = self
            .templates
            .render(POST_TEMPLATE, &page)
            .map_err(|e| e.at(&source, Stage::Template))?;

        self.build
            .write(&output_file(name), html.as_bytes())
            .map_err(|e| e.at(&source, Stage::Write))?;

        Ok((post, html))
    }

    fn write_index(&self, posts: &[(String, Post)]) -> Result<()> {
        let page = IndexPage {
            site_title: &self.site_title,
            posts: posts
                .iter()
                .map(|(file, post)| IndexEntry {
                    file,
                    title: &post.title,
                    author: &post.author,
                    date: &post.date,
                })
                .collect(),
        };

        let html = self
            .templates
            .render(INDEX_TEMPLATE, &page)
            .map_err(|e| e.at(INDEX_FILE, Stage::Template))?;
        self.build
            .write(INDEX_FILE, html.as_bytes())
            .map_err(|e| e.at(INDEX_FILE, Stage::Write))?;

        tracing::debug!("Wrote index with {} posts", posts.len());
        Ok(())
    }
}
