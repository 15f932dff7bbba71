use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::store::StoreBackend;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its backups subdirectory, an initial `config.json` with default
/// settings and an empty store.
///
/// # Arguments
/// - `dompet_home` - The directory that will be the root of data directory, e.g. `$HOME/dompet`
/// - `store` - Whether transactions and targets are kept in SQLite or in a JSON document.
///
/// # Errors
/// - Returns an error if the directory was already initialized.
/// - Returns an error if any file operations fail.
pub async fn init(dompet_home: &Path, store: StoreBackend) -> Result<Out<()>> {
    let config = Config::create(dompet_home, store)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the dompet directory at {} with a {} store",
        config.root().display(),
        store
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_then_init_again() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("dompet");
        let out = init(&home, StoreBackend::Json).await.unwrap();
        assert!(out.message().contains("json store"));
        assert!(home.join("config.json").is_file());

        let err = init(&home, StoreBackend::Json).await.unwrap_err();
        assert_eq!(err.to_string(), "config error");
        assert!(format!("{err:#}").contains("already exists"));
    }
}
