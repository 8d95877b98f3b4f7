use std::{
    path::{Component, Path, PathBuf},
    time::{Duration, SystemTime},
};

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{CleanupReport, FileFormat, GeneratedFile},
};

const MAX_SLUG_LEN: usize = 80;

static SAFE_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("SAFE_FILE_NAME is a valid regex pattern")
});

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates the storage root if needed; calling it again is a no-op.
    async fn ensure_root(&self) -> AppResult<()>;
    async fn save(&self, title: &str, markup: &str) -> AppResult<GeneratedFile>;
    async fn read(&self, file_name: &str) -> AppResult<Vec<u8>>;
    async fn cleanup(&self, max_age: Duration) -> AppResult<CleanupReport>;
}

/// Lowercase title with non-alphanumeric runs collapsed to `_`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug: String = slug.trim_matches('_').chars().take(MAX_SLUG_LEN).collect();
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "document".to_string()
    } else {
        slug.to_string()
    }
}

/// `<slug>_<unix-millis>_<8 hex>.html`
pub fn generate_file_name(title: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}{}",
        slugify(title),
        Utc::now().timestamp_millis(),
        &token[..8],
        FileFormat::Html.extension()
    )
}

/// Rejects any name that could escape the storage root or has an unaccepted extension.
pub fn validate_file_name(file_name: &str) -> AppResult<FileFormat> {
    let format = FileFormat::from_file_name(file_name).ok_or_else(|| {
        AppError::ValidationError("Invalid file type. Only PDF and HTML files are allowed".to_string())
    })?;

    if file_name.contains("..") || !SAFE_FILE_NAME.is_match(file_name) {
        return Err(AppError::ValidationError(format!(
            "Invalid file name: {file_name}"
        )));
    }

    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(format),
        _ => Err(AppError::ValidationError(format!(
            "Invalid file name: {file_name}"
        ))),
    }
}

pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, file_name: &str) -> AppResult<PathBuf> {
        validate_file_name(file_name)?;
        let path = self.root.join(file_name);
        if path.parent() != Some(self.root.as_path()) {
            return Err(AppError::ValidationError(format!(
                "Invalid file name: {file_name}"
            )));
        }
        Ok(path)
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn ensure_root(&self) -> AppResult<()> {
        match tokio::fs::create_dir_all(&self.root).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && self.root.is_dir() => Ok(()),
            Err(e) => {
                log::error!("Failed to create storage root {}: {}", self.root.display(), e);
                Err(e.into())
            }
        }
    }

    async fn save(&self, title: &str, markup: &str) -> AppResult<GeneratedFile> {
        self.ensure_root().await?;

        let file_name = generate_file_name(title);
        let file_path = self.root.join(&file_name);
        tokio::fs::write(&file_path, markup.as_bytes())
            .await
            .map_err(|e| {
                log::error!("Failed to write {}: {}", file_path.display(), e);
                AppError::StorageError(format!("Failed to save {file_name}: {e}"))
            })?;

        log::info!("Saved document {} ({} bytes)", file_name, markup.len());
        Ok(GeneratedFile {
            file_name,
            file_path,
            created_at: Utc::now(),
        })
    }

    async fn read(&self, file_name: &str) -> AppResult<Vec<u8>> {
        let path = self.resolve(file_name)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("File not found: {file_name}")))
            }
            Err(e) => {
                log::error!("Failed to read {}: {}", path.display(), e);
                Err(e.into())
            }
        }
    }

    async fn cleanup(&self, max_age: Duration) -> AppResult<CleanupReport> {
        let mut report = CleanupReport::default();

        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(report),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("Skipping {}: {}", entry.path().display(), e);
                    report.failed += 1;
                    continue;
                }
            };
            report.scanned += 1;

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();
            if age <= max_age {
                continue;
            }

            let path = entry.path();
            let removal = tokio::fs::remove_file(&path).await;
            record_removal(&mut report, &path, removal);
        }

        Ok(report)
    }
}

/// Tallies one removal attempt; a failure is counted and the sweep goes on.
fn record_removal(report: &mut CleanupReport, path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => {
            log::info!("Cleaned up old file: {}", path.display());
            report.removed += 1;
        }
        Err(e) => {
            log::warn!("Failed to remove {}: {}", path.display(), e);
            report.failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_and_trims() {
        assert_eq!(slugify("Water Cycle"), "water_cycle");
        assert_eq!(slugify("  Photosynthesis -- Grade 6!! "), "photosynthesis_grade_6");
        assert_eq!(slugify("???"), "document");
        assert_eq!(slugify(&"a".repeat(200)).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn file_names_are_unique_within_a_tick() {
        let first = generate_file_name("Water Cycle");
        let second = generate_file_name("Water Cycle");

        assert_ne!(first, second);
        assert!(first.starts_with("water_cycle_"));
        assert!(first.ends_with(".html"));
        assert!(validate_file_name(&first).is_ok());
    }

    #[test]
    fn validation_rejects_escaping_names() {
        for name in [
            "../../etc/passwd.pdf",
            "..%2Fsecret.pdf",
            "/etc/passwd.pdf",
            "nested/file.html",
            ".hidden.html",
            "a..b.html",
            "",
        ] {
            assert!(
                matches!(validate_file_name(name), Err(AppError::ValidationError(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn validation_rejects_unaccepted_extensions() {
        assert!(matches!(
            validate_file_name("notes.txt"),
            Err(AppError::ValidationError(_))
        ));
        assert_eq!(validate_file_name("notes_1.pdf").ok(), Some(FileFormat::Pdf));
    }

    #[actix_web::test]
    async fn read_rejects_before_touching_filesystem() {
        let store = LocalDocumentStore::new("/definitely/not/a/real/root");
        let result = store.read("../../etc/passwd.pdf").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn cleanup_of_missing_root_is_empty() {
        let store = LocalDocumentStore::new("/definitely/not/a/real/root");
        let report = store.cleanup(Duration::from_secs(1)).await.expect("missing root is fine");
        assert_eq!(report, CleanupReport::default());
    }

    #[test]
    fn failed_removal_is_counted_and_sweep_continues() {
        let mut report = CleanupReport {
            scanned: 3,
            ..CleanupReport::default()
        };
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");

        record_removal(&mut report, Path::new("old_1.html"), Err(denied));
        record_removal(&mut report, Path::new("old_2.html"), Ok(()));
        record_removal(&mut report, Path::new("old_3.html"), Ok(()));

        assert_eq!(
            report,
            CleanupReport {
                scanned: 3,
                removed: 2,
                failed: 1,
            }
        );
    }
}
