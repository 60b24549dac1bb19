//! Delete a post

use anyhow::Result;

use crate::Site;

/// Delete a post's source and output
pub fn run(site: &Site, name: &str) -> Result<()> {
    site.delete_post(name)?;
    println!("Deleted: {}", name);
    Ok(())
}
