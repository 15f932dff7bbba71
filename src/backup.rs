//! Rotating JSON snapshots of the budget, written before destructive commands.

use crate::model::BudgetData;
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::Local;
use std::path::PathBuf;

/// Prefix for snapshots taken before transactions or targets are deleted.
pub const PRE_DELETE: &str = "pre-delete";

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
        }
    }

    /// Saves `BudgetData` as a pretty-printed JSON backup file.
    ///
    /// The filename format is `{prefix}.YYYY-MM-DD-NNN.json` where NNN is a sequence number.
    /// Automatically rotates old backups, keeping only `backup_copies` files.
    ///
    /// Returns the path to the created backup file.
    pub async fn save_json(&self, prefix: &str, data: &BudgetData) -> Result<PathBuf> {
        let date = today();
        let seq = self.next_sequence_number(prefix, &date).await?;
        let filename = format!("{prefix}.{date}-{seq:03}.json");
        let path = self.backups_dir.join(&filename);

        let json =
            serde_json::to_string_pretty(data).context("Failed to serialize budget data to JSON")?;
        utils::write(&path, json).await?;

        self.rotate(prefix).await?;

        Ok(path)
    }

    /// The file names in the backups directory.
    async fn file_names(&self) -> Result<Vec<(PathBuf, String)>> {
        let paths = utils::read_dir(&self.backups_dir).await?;
        Ok(paths
            .into_iter()
            .filter_map(|p| {
                let name = p.file_name()?.to_string_lossy().to_string();
                Some((p, name))
            })
            .collect())
    }

    /// Scans the backups directory for existing files with the given prefix and date,
    /// and returns the next sequence number.
    async fn next_sequence_number(&self, prefix: &str, date: &str) -> Result<u32> {
        let max_seq = self
            .file_names()
            .await?
            .iter()
            .filter_map(|(_, name)| parse_sequence_number(name, prefix, date))
            .max()
            .unwrap_or(0);
        Ok(max_seq + 1)
    }

    /// Rotates old backup files, keeping only `backup_copies` files with the given prefix.
    async fn rotate(&self, prefix: &str) -> Result<()> {
        let mut files: Vec<(PathBuf, String)> = self
            .file_names()
            .await?
            .into_iter()
            .filter(|(_, name)| is_backup_file(name, prefix))
            .collect();

        // Sort by filename (which sorts by date and sequence number due to format)
        files.sort_by(|a, b| a.1.cmp(&b.1));

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for (path, _) in files.into_iter().take(to_delete) {
            utils::remove(&path).await?;
        }

        Ok(())
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from a backup filename of the form `{prefix}.{date}-{NNN}.json`.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    filename
        .strip_prefix(&format!("{prefix}.{date}-"))?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

fn is_backup_file(filename: &str, prefix: &str) -> bool {
    filename.starts_with(&format!("{prefix}.")) && filename.ends_with(".json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!(
            parse_sequence_number("pre-delete.2026-10-18-001.json", PRE_DELETE, "2026-10-18"),
            Some(1)
        );
        assert_eq!(
            parse_sequence_number("pre-delete.2026-10-18-042.json", PRE_DELETE, "2026-10-18"),
            Some(42)
        );
        // Wrong prefix
        assert_eq!(
            parse_sequence_number("other.2026-10-18-001.json", PRE_DELETE, "2026-10-18"),
            None
        );
        // Wrong date
        assert_eq!(
            parse_sequence_number("pre-delete.2026-10-17-001.json", PRE_DELETE, "2026-10-18"),
            None
        );
        assert_eq!(
            parse_sequence_number("pre-delete.2026-10-18-001.txt", PRE_DELETE, "2026-10-18"),
            None
        );
    }

    #[test]
    fn test_is_backup_file() {
        assert!(is_backup_file("pre-delete.2026-10-18-001.json", PRE_DELETE));
        assert!(!is_backup_file("pre-deleted.2026-10-18-001.json", PRE_DELETE));
        assert!(!is_backup_file("pre-delete.2026-10-18-001", PRE_DELETE));
    }

    #[tokio::test]
    async fn test_save_json_rotates() {
        let env = TestEnv::new().await;
        let backup = env.config().backup();
        let data = BudgetData::default();

        let mut paths = Vec::new();
        for _ in 0..7 {
            paths.push(backup.save_json(PRE_DELETE, &data).await.unwrap());
        }

        let mut names: Vec<String> = utils::read_dir(env.config().backups())
            .await
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect();
        names.sort();
        assert_eq!(names.len(), env.config().backup_copies() as usize);
        assert!(names.last().unwrap().ends_with("-007.json"));
        assert!(!paths[0].exists());
        assert!(paths[6].exists());
    }
}
