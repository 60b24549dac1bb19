//! List posts

use anyhow::Result;

use crate::Site;

/// Print every post with its date, title and publish state
pub fn run(site: &Site) -> Result<()> {
    let entries = site.list_posts()?;
    println!("Posts ({}):", entries.len());

    for entry in entries {
        let status = entry.metadata.summary().status;
        match entry.post {
            Ok(post) => println!(
                "  {} - {} [{}] ({})",
                post.date, post.title, entry.name, status
            ),
            Err(e) => println!("  [{}] ({}) error: {}", entry.name, status, e),
        }
    }

    Ok(())
}
