//! `adpanel demo`: prints the demo brief.

use anyhow::{Context, Result};

use super::brief::Brief;

pub fn print() -> Result<()> {
    let text = toml::to_string_pretty(&Brief::demo()).context("Failed to render demo brief")?;
    print!("{}", text);
    Ok(())
}
