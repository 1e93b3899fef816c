//! Artifact loader - turns manifest files in a directory into artifact instances

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use super::manifest::ArtifactManifest;
use crate::application::errors::ArtifactError;

/// Extensions recognised as artifact manifests
pub const ARTIFACT_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Extension of translation and model files
pub const JSON_EXTENSIONS: &[&str] = &["json"];

/// Outcome of loading one file
pub enum LoadResult<T: ?Sized> {
    Success { file: PathBuf, artifact: Arc<T> },
    Failure { file_name: String, error: ArtifactError },
}

impl<T: ?Sized> LoadResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, LoadResult::Success { .. })
    }
}

/// A failed file, kept for the module's load report
#[derive(Debug)]
pub struct LoadFailure {
    /// Owning module, empty until the report leaves its module
    pub module: String,
    pub file_name: String,
    pub error: ArtifactError,
}

/// What one registration phase did
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn record_failure(&mut self, file_name: impl Into<String>, error: ArtifactError) {
        self.failures.push(LoadFailure {
            module: String::new(),
            file_name: file_name.into(),
            error,
        });
    }

    /// Attribute every failure not yet attributed to `module`
    pub fn for_module(mut self, module: &str) -> Self {
        for failure in self.failures.iter_mut().filter(|f| f.module.is_empty()) {
            failure.module = module.to_string();
        }
        self
    }

    /// Artifacts that loaded but had the wrong capability
    pub fn mismatches(&self) -> impl Iterator<Item = &LoadFailure> {
        self.failures.iter().filter(|f| f.error.is_structural_mismatch())
    }

    pub fn absorb(&mut self, other: LoadReport) {
        self.loaded.extend(other.loaded);
        self.failures.extend(other.failures);
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Directory entry as seen by the scanners
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// List a directory sorted by name, skipping hidden entries.
///
/// A missing directory yields an empty listing.
pub async fn list_dir(dir: &Path) -> std::io::Result<Vec<DirEntry>> {
    let mut reader = match tokio::fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let is_dir = entry.file_type().await?.is_dir();
        entries.push(DirEntry {
            name,
            path: entry.path(),
            is_dir,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// A file found by [`walk_files`] with the sub-directories leading to it
#[derive(Debug, Clone)]
pub struct WalkedFile {
    pub segments: Vec<String>,
    pub entry: DirEntry,
}

impl WalkedFile {
    pub fn relative_name(&self) -> String {
        relative_name(&self.segments, &self.entry.name)
    }
}

type WalkFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Every file under `base` matching `extensions`, depth-first.
///
/// Entries are visited in sorted order and each sub-directory is descended
/// into where it appears. Unreadable directories are logged and skipped.
pub async fn walk_files(base: &Path, extensions: &[&str]) -> Vec<WalkedFile> {
    let mut files = Vec::new();
    walk_into(base, Vec::new(), extensions, &mut files).await;
    files
}

fn walk_into<'a>(
    base: &'a Path,
    segments: Vec<String>,
    extensions: &'a [&'a str],
    files: &'a mut Vec<WalkedFile>,
) -> WalkFuture<'a> {
    Box::pin(async move {
        let dir = segments.iter().fold(base.to_path_buf(), |dir, s| dir.join(s));
        let entries = match list_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "Failed to read directory: {}", e);
                return;
            }
        };

        for entry in entries {
            if entry.is_dir {
                let mut next = segments.clone();
                next.push(entry.name);
                walk_into(base, next, extensions, &mut *files).await;
            } else if matches_filter(&entry.path, extensions) {
                files.push(WalkedFile {
                    segments: segments.clone(),
                    entry,
                });
            }
        }
    })
}

/// Whether `path` is a visible file with one of `extensions`
pub fn matches_filter(path: &Path, extensions: &[&str]) -> bool {
    let visible = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| !n.starts_with('.'))
        .unwrap_or(false);

    visible
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
}

/// File name without directories and extension, for diagnostics
pub fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// `a/b/file.ext` for a file found under the sub-directories `segments`
pub fn relative_name(segments: &[String], file: &str) -> String {
    if segments.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", segments.join("/"), file)
    }
}

/// Load a single artifact: read its manifest and instantiate the declared export
pub async fn load_artifact<T, F>(path: &Path, instantiate: F) -> Result<Arc<T>, ArtifactError>
where
    T: ?Sized,
    F: Fn(&str) -> Result<Arc<T>, ArtifactError>,
{
    let manifest = ArtifactManifest::from_file(path).await?;
    instantiate(manifest.export()?)
}

/// Load every matching file in `dir` (non-recursive).
///
/// Each file is isolated: a failure is reported in its own result and the
/// scan moves on to the next file.
pub async fn load_artifacts<T, F>(dir: &Path, extensions: &[&str], instantiate: F) -> Vec<LoadResult<T>>
where
    T: ?Sized,
    F: Fn(&str) -> Result<Arc<T>, ArtifactError>,
{
    let entries = match list_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), "Failed to read directory: {}", e);
            return Vec::new();
        }
    };

    let mut results = Vec::new();
    for entry in entries {
        if entry.is_dir || !matches_filter(&entry.path, extensions) {
            continue;
        }

        match load_artifact(&entry.path, &instantiate).await {
            Ok(artifact) => results.push(LoadResult::Success {
                file: entry.path,
                artifact,
            }),
            Err(error) => results.push(LoadResult::Failure {
                file_name: entry.name,
                error,
            }),
        }
    }
    results
}

/// Read and parse a JSON file
pub async fn read_json(path: &Path) -> Result<serde_json::Value, ArtifactError> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}
