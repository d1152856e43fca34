use std::path::Path;

use anyhow::{Result, bail};

/// Accept `sqlite::memory:`, full `sqlite:` URLs, or a bare file path.
pub fn normalize_sqlite_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("invalid --db value: {raw:?}");
    }
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite:") {
        return Ok(trimmed.to_owned());
    }
    let absolute = std::path::absolute(trimmed)?;
    Ok(format!("sqlite://{}?mode=rwc", absolute.display()))
}

/// Create the parent directory of a file-backed database.
pub fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid database url: {db_url}");
    }
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
