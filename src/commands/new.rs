//! Create a new post

use anyhow::Result;

use crate::content::post::source_file;
use crate::Site;

/// Create a post from a title and build it
pub fn run(site: &Site, title: &str) -> Result<()> {
    let name = site.new_post(title)?;
    println!("Created: {:?}", site.raw_dir.join(source_file(&name)));
    Ok(())
}
