//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::content::post::source_file;
use crate::content::{metadata, Post};
use crate::store::{FsStore, PostStore};
use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# inkpress configuration

# Site
title: inkpress
author: anonymous

# Directories
raw_dir: posts
build_dir: build
template_dir: templates

# Index page
index:
  enable: true
  refresh_on_write: true

# Code highlighting
highlight:
  enable: true
  theme: base16-ocean.dark

# Admin server
server:
  ip: localhost
  port: 8080
"#;

const SAMPLE_POST: &str = r#"Welcome to inkpress! This is your very first post.

## Quick Start

### Create a new post

```bash
$ inkpress new "My New Post"
```

### Run server

```bash
$ inkpress server
```

Then open `/_admin/` to edit posts in the browser.

### Generate static files

```bash
$ inkpress generate
```
"#;

/// Initialize a new site in the given directory. An existing config file is
/// kept.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, DEFAULT_CONFIG)?;
    }
    let config = SiteConfig::load(&config_path)?;

    let raw_dir = target_dir.join(&config.raw_dir);
    fs::create_dir_all(&raw_dir)?;
    let raw = FsStore::new(&raw_dir);

    let sample = source_file("hello-world");
    if !raw.exists(&sample)? {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let mut post = Post::new("Hello World", config.author, today).normalized()?;
        post.content = SAMPLE_POST.to_string();
        raw.write(&sample, &metadata::encode(&post))?;
    }

    Ok(())
}
