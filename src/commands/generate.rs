//! Generate static files

use anyhow::Result;

use crate::Site;

/// Build every post and the index. Stops at the first post that fails.
pub fn run(site: &Site) -> Result<()> {
    let built = site.generate()?;
    for (file, post) in &built {
        tracing::debug!("Generated {} ({})", file, post.title);
    }
    println!("Generated {} posts into {:?}", built.len(), site.build_dir);
    Ok(())
}
