use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Opens a rendered page in a browser, preferring the configured command.
pub fn open_page(path: &Path, open_command: Option<&str>) -> Result<()> {
    if let Some(cmd) = open_command {
        Command::new(cmd)
            .arg(path)
            .spawn()
            .with_context(|| format!("failed to run open_command {:?}", cmd))?;
        return Ok(());
    }
    // Try using the system default
    if open::that(path).is_ok() {
        return Ok(());
    }
    // Fallback: try firefox directly
    Command::new("firefox")
        .arg(path)
        .spawn()
        .with_context(|| format!("no browser available to open {}", path.display()))?;
    Ok(())
}
