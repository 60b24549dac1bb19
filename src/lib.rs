//! inkpress: a minimal markdown content manager
//!
//! Posts live as text files with a `+++`-delimited metadata block in a raw
//! directory. The generator renders them to HTML in a build directory, and a
//! small admin interface creates, edits and deletes them.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod server;
pub mod store;
pub mod templates;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{is_valid_name, Post, PostMetadata};
use generator::Generator;
use store::FsStore;
use templates::TemplateRenderer;

pub use error::{Error, ErrorKind, Result};

/// Name of the configuration file in the site directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A post as shown in listings. The post itself may fail to decode without
/// hiding the rest of the listing.
#[derive(Debug)]
pub struct PostEntry {
    pub name: String,
    pub post: Result<Post>,
    pub metadata: PostMetadata,
}

/// The main application: a site directory with its configuration, stores
/// and generator
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Raw post directory
    pub raw_dir: PathBuf,
    /// Build (output) directory
    pub build_dir: PathBuf,
    /// Template override directory
    pub template_dir: PathBuf,
    generator: Generator,
}

impl Site {
    /// Open a site from a directory. A missing config file means defaults.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let raw_dir = base_dir.join(&config.raw_dir);
        let build_dir = base_dir.join(&config.build_dir);
        let template_dir = base_dir.join(&config.template_dir);

        let templates = TemplateRenderer::with_overrides(&template_dir)?;
        let generator = Generator::new(
            &config,
            Arc::new(FsStore::new(&raw_dir)),
            Arc::new(FsStore::new(&build_dir)),
            templates,
        );

        Ok(Self {
            config,
            base_dir,
            raw_dir,
            build_dir,
            template_dir,
            generator,
        })
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Build every post and the index
    pub fn generate(&self) -> Result<Vec<(String, Post)>> {
        self.generator.build_all()
    }

    /// Every post with its publish state
    pub fn list_posts(&self) -> Result<Vec<PostEntry>> {
        let mut entries = Vec::new();
        for name in self.generator.post_names()? {
            let post = self.generator.load(&name).map(|(post, _)| post);
            let metadata = self.generator.publish_state(&name)?;
            entries.push(PostEntry {
                name,
                post,
                metadata,
            });
        }
        Ok(entries)
    }

    /// A single post and its publish state
    pub fn get_post(&self, name: &str) -> Result<(Post, PostMetadata)> {
        check_name(name)?;
        self.generator.load(name)
    }

    /// The raw text of a post, whether or not it decodes
    pub fn get_source(&self, name: &str) -> Result<String> {
        check_name(name)?;
        self.generator.source(name)
    }

    /// Create, build and index a new post. Returns the derived name.
    pub fn new_post(&self, title: &str) -> Result<String> {
        self.generator.create(title)?;
        let name = content::derive_name(title.trim());
        self.generator.build_one(&name)?;
        self.refresh_index();
        tracing::info!("Created post {}", name);
        Ok(name)
    }

    /// Replace a post, then rebuild it and the index
    pub fn save_post(&self, name: &str, post: Post) -> Result<Post> {
        check_name(name)?;
        let post = self.generator.save(name, post)?;
        self.generator.build_one(name)?;
        self.refresh_index();
        tracing::info!("Saved post {}", name);
        Ok(post)
    }

    /// Remove a post's source and output, then rebuild the index
    pub fn delete_post(&self, name: &str) -> Result<()> {
        check_name(name)?;
        self.generator.delete(name)?;
        self.refresh_index();
        tracing::info!("Deleted post {}", name);
        Ok(())
    }

    /// Rebuild the index after a write. The write itself already
    /// succeeded, so a post that cannot be indexed is only logged.
    fn refresh_index(&self) {
        if !self.config.index.refresh_on_write {
            return;
        }
        if let Err(e) = self.generator.refresh_index() {
            tracing::warn!("Index not refreshed: {}", e);
        }
    }
}

/// Names come from URLs and the command line; only names [`content::derive_name`]
/// could produce refer to posts
fn check_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site_with_post() -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(
            dir.path().join("posts/hello.md"),
            "+++\nTitle = Hi\nAuthor = Ana\nDate = 2024-01-01\n+++\n# Hi there\n",
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    #[test]
    fn test_site_uses_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "raw_dir: src\nbuild_dir: public\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.raw_dir, dir.path().join("src"));
        assert_eq!(site.build_dir, dir.path().join("public"));
    }

    #[test]
    fn test_new_post_builds_and_indexes() {
        let (_dir, site) = site_with_post();

        let name = site.new_post("Hello, World!").unwrap();
        assert_eq!(name, "Hello--World-");
        assert!(site.raw_dir.join("Hello--World-.md").exists());
        assert!(site.build_dir.join("Hello--World-.html").exists());

        let index = fs::read_to_string(site.build_dir.join("index.html")).unwrap();
        assert!(index.contains("Hello--World-.html"));
        assert!(index.contains("hello.html"));

        let err = site.new_post("Hello, World!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_save_post_updates_output_and_index() {
        let (_dir, site) = site_with_post();
        site.generate().unwrap();

        let (post, _) = site.get_post("hello").unwrap();
        site.save_post(
            "hello",
            Post {
                title: "Renamed".to_string(),
                ..post
            },
        )
        .unwrap();

        let html = fs::read_to_string(site.build_dir.join("hello.html")).unwrap();
        assert!(html.contains("Renamed"));
        let index = fs::read_to_string(site.build_dir.join("index.html")).unwrap();
        assert!(index.contains("Renamed"));
    }

    #[test]
    fn test_index_left_alone_when_refresh_disabled() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "index:\n  refresh_on_write: false\n",
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();

        site.new_post("First").unwrap();
        assert!(!site.build_dir.join("index.html").exists());
    }

    #[test]
    fn test_delete_post() {
        let (_dir, site) = site_with_post();
        site.generate().unwrap();

        site.delete_post("hello").unwrap();
        assert!(!site.raw_dir.join("hello.md").exists());
        assert!(!site.build_dir.join("hello.html").exists());

        // Nothing left to delete is still fine
        site.delete_post("hello").unwrap();
    }

    #[test]
    fn test_invalid_names_are_not_found() {
        let (_dir, site) = site_with_post();
        assert_eq!(
            site.get_post("../posts/hello").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            site.delete_post("hello.md").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert!(site.raw_dir.join("hello.md").exists());
    }

    #[test]
    fn test_writes_succeed_next_to_broken_post() {
        let (_dir, site) = site_with_post();
        fs::write(site.raw_dir.join("broken.md"), "no metadata").unwrap();

        let name = site.new_post("Fresh").unwrap();
        assert_eq!(name, "Fresh");
        assert!(site.build_dir.join("Fresh.html").exists());
        assert_eq!(
            site.new_post("Fresh").unwrap_err().kind(),
            ErrorKind::Conflict
        );

        let (post, _) = site.get_post("hello").unwrap();
        let saved = site
            .save_post(
                "hello",
                Post {
                    title: "Renamed".to_string(),
                    ..post
                },
            )
            .unwrap();
        assert_eq!(saved.title, "Renamed");
        let html = fs::read_to_string(site.build_dir.join("hello.html")).unwrap();
        assert!(html.contains("Renamed"));

        site.delete_post("hello").unwrap();
        assert!(!site.raw_dir.join("hello.md").exists());
        assert!(site.raw_dir.join("broken.md").exists());
    }

    #[test]
    fn test_list_posts_keeps_broken_posts() {
        let (_dir, site) = site_with_post();
        fs::write(site.raw_dir.join("broken.md"), "no metadata").unwrap();

        let entries = site.list_posts().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "broken");
        assert_eq!(
            entries[0].post.as_ref().unwrap_err().kind(),
            ErrorKind::Format
        );
        assert_eq!(entries[1].post.as_ref().unwrap().title, "Hi");
        assert!(entries[1].metadata.is_stale());
    }
}
