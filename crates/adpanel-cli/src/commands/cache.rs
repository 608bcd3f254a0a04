//! `adpanel cache`: inspects and invalidates cached persona panels.

use std::path::PathBuf;

use anyhow::Result;

use adpanel_infrastructure::FilePanelCache;

fn open(path: Option<PathBuf>) -> Result<FilePanelCache> {
    Ok(match path {
        Some(path) => FilePanelCache::new(path),
        None => FilePanelCache::default_location()?,
    })
}

pub fn list(path: Option<PathBuf>) -> Result<()> {
    let entries = open(path)?.list()?;
    if entries.is_empty() {
        println!("No cached panels.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{:<40}  {:>3} personas  {}  {}",
            entry.panel.brand_key,
            entry.persona_count,
            entry.cached_at.format("%Y-%m-%d %H:%M"),
            entry.name
        );
    }
    Ok(())
}

pub fn invalidate(path: Option<PathBuf>, key: &str) -> Result<()> {
    if open(path)?.invalidate(key)? {
        println!("Removed cached panel '{}'.", key);
    } else {
        println!("No cached panel for '{}'.", key);
    }
    Ok(())
}
