use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its `.secrets` subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `finboard_home` - The directory that will hold configuration and session data, e.g.
///   `$HOME/finboard`
/// - `backend_url` - The base URL of the backend project
/// - `anon_key` - The public key of the backend project
///
/// # Errors
/// - Returns an error if the URL is invalid, the key is empty, or any file operation fails.
pub async fn init(finboard_home: &Path, backend_url: &str, anon_key: &str) -> Result<Out<()>> {
    let config = Config::create(finboard_home, backend_url, anon_key)
        .await
        .context("Unable to create the home directory and config")?;
    Ok(format!(
        "Created the finboard home at {}. Run 'finboard login' next.",
        config.root().display()
    )
    .into())
}
