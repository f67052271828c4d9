//! One-shot copy of every file in a source folder into an object store.
//!
//! Listing the folder is all-or-nothing. After that each file is copied on its own: a
//! failed download or upload is logged and the file is left out of the result, the
//! rest of the batch carries on. There is no retry.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Serialize;
use tracing::{error, info};

pub const DEFAULT_BUCKET: &str = "wco-baseball-rawcsv";
pub const DEFAULT_KEY_PREFIX: &str = "uploads/";

#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

/// A folder whose files can be enumerated and fetched whole.
pub trait RemoteFolder {
    fn describe(&self) -> String;

    /// Non-folder entries only.
    fn list_files(&self) -> Result<Vec<RemoteFile>>;

    fn download(&self, file: &RemoteFile) -> Result<Vec<u8>>;
}

pub trait ObjectStore {
    fn describe(&self) -> String;

    /// Stores `body` under `key` and returns the object's URL.
    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<String>;
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize)]
pub struct SyncedFile {
    pub name: String,
    pub size: usize,
    pub url: String,
}

pub fn object_key(prefix: &str, file_name: &str) -> String {
    format!("{}{}", prefix, file_name.replace(' ', "_"))
}

fn copy_file(
    folder: &dyn RemoteFolder,
    store: &dyn ObjectStore,
    prefix: &str,
    file: &RemoteFile,
) -> Result<SyncedFile> {
    let body = folder.download(file)?;
    let url = store.put_object(&object_key(prefix, &file.name), &body, &file.mime_type)?;
    Ok(SyncedFile {
        name: file.name.clone(),
        size: body.len(),
        url,
    })
}

pub fn sync_folder(
    folder: &dyn RemoteFolder,
    store: &dyn ObjectStore,
    prefix: &str,
) -> Result<Vec<SyncedFile>> {
    info!(
        "Starting synchronization of {} to {}",
        folder.describe(),
        store.describe()
    );
    let files = folder
        .list_files()
        .with_context(|| format!("Error listing files in {}", folder.describe()))?;
    if files.is_empty() {
        info!("No files found in {}", folder.describe());
        return Ok(vec![]);
    }
    info!("Found {} files. Starting transfer...", files.len());

    let mut synced = Vec::with_capacity(files.len());
    for file in &files {
        match copy_file(folder, store, prefix, file) {
            Ok(s) => {
                info!(
                    "Transferred: {} (Size: {} KB) -> {}",
                    s.name,
                    (s.size as f64 / 1024.0).round(),
                    s.url
                );
                synced.push(s);
            }
            Err(e) => error!("Failed to process file {} ({}): {:#}", file.name, file.id, e),
        }
    }
    Ok(synced)
}

/// JSON body reported for a sync run.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SyncSummary {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<Vec<SyncedFile>>> for SyncSummary {
    fn from(result: &Result<Vec<SyncedFile>>) -> Self {
        match result {
            Ok(files) => Self {
                success: true,
                message: format!("Synchronized {} files", files.len()),
                count: Some(files.len()),
                files: Some(files.iter().map(|f| f.name.clone()).collect()),
                error: None,
            },
            Err(e) => Self {
                success: false,
                message: "Failed to synchronize folder".to_string(),
                count: None,
                files: None,
                error: Some(format!("{e:#}")),
            },
        }
    }
}

fn guess_mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// A directory on local disk standing in for the remote folder.
#[derive(Debug, Clone)]
pub struct LocalFolder {
    root: PathBuf,
}

impl LocalFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RemoteFolder for LocalFolder {
    fn describe(&self) -> String {
        format!("folder {}", self.root.display())
    }

    fn list_files(&self) -> Result<Vec<RemoteFile>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read directory {}", self.root.display()))?
            .collect::<std::io::Result<Vec<_>>>()?;
        let files = entries
            .into_iter()
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or_default())
            .map(|e| {
                let path = e.path();
                RemoteFile {
                    id: path.display().to_string(),
                    name: e.file_name().to_string_lossy().into_owned(),
                    mime_type: guess_mime_type(&path).to_string(),
                }
            })
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .collect();
        Ok(files)
    }

    fn download(&self, file: &RemoteFile) -> Result<Vec<u8>> {
        let path = self.root.join(&file.name);
        fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// A bucket laid out as `root/bucket/key` on local disk.
#[derive(Debug, Clone)]
pub struct LocalBucket {
    root: PathBuf,
    bucket: String,
}

impl LocalBucket {
    pub fn new(root: impl Into<PathBuf>, bucket: &str) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.to_string(),
        }
    }

    pub fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(&self.bucket).join(key)
    }
}

impl ObjectStore for LocalBucket {
    fn describe(&self) -> String {
        format!("bucket {} at {}", self.bucket, self.root.display())
    }

    fn put_object(&self, key: &str, body: &[u8], _content_type: &str) -> Result<String> {
        let path = self.object_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        let absolute = path.canonicalize().unwrap_or(path);
        Ok(format!("file://{}", absolute.display()))
    }
}
