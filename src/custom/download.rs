//! Helpers that materialize a completed export on the local file system
//!
//! [`download_exported`](CustomExportClient::download_exported) writes to a caller-chosen path.
//! The scoped helpers download into a fresh temporary file, hand it to a callback, and delete it
//! afterwards whatever the callback's outcome; a failed deletion is logged and otherwise
//! ignored.

use super::{CustomExportClient, ExportStatus, completed_url};
use crate::error::{Error, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

/// Line iterator over a downloaded export
pub type ExportLines = tokio::io::Lines<BufReader<File>>;

impl CustomExportClient {
    /// Download a completed export to `destination`, creating or truncating it
    ///
    /// Returns the destination path. The file is not created when the precondition check or the
    /// request fails; a transfer interrupted midway leaves a partial file behind. A connection
    /// failure while streaming is reported as [`Error::Network`], a local write failure as
    /// [`Error::Io`].
    pub async fn download_exported(
        &self,
        status: &ExportStatus,
        destination: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let destination = destination.as_ref();
        let mut reader = self.read_exported(status).await?;

        let mut file = File::create(destination)
            .await
            .map_err(|e| io_context(e, "create", destination))?;
        let bytes = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| copy_error(e, destination))?;
        file.flush()
            .await
            .map_err(|e| io_context(e, "flush", destination))?;

        debug!(bytes, path = %destination.display(), "export downloaded");
        Ok(destination.to_path_buf())
    }

    /// Download into a temporary file and pass its path to `apply`
    ///
    /// The temporary file is deleted once `apply` finishes, fails, or unwinds.
    pub async fn download_and_apply<F, Fut, R, E>(
        &self,
        status: &ExportStatus,
        apply: F,
    ) -> std::result::Result<R, E>
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = std::result::Result<R, E>>,
        E: From<Error>,
    {
        completed_url(status)?;
        let temp = ScopedTempFile::new()?;

        match self.download_exported(status, temp.path()).await {
            Ok(path) => apply(path).await,
            Err(e) => Err(E::from(e)),
        }
    }

    /// Download into a temporary file and pass an open read handle to `read`
    pub async fn download_and_read<F, Fut, R, E>(
        &self,
        status: &ExportStatus,
        read: F,
    ) -> std::result::Result<R, E>
    where
        F: FnOnce(File) -> Fut,
        Fut: Future<Output = std::result::Result<R, E>>,
        E: From<Error>,
    {
        self.download_and_apply(status, |path| async move {
            let file = File::open(&path)
                .await
                .map_err(|e| E::from(io_context(e, "open", &path)))?;
            read(file).await
        })
        .await
    }

    /// Download into a temporary file and pass its lines to `read`
    ///
    /// Lines are decoded as UTF-8 with the terminators stripped.
    pub async fn download_and_read_lines<F, Fut, R, E>(
        &self,
        status: &ExportStatus,
        read: F,
    ) -> std::result::Result<R, E>
    where
        F: FnOnce(ExportLines) -> Fut,
        Fut: Future<Output = std::result::Result<R, E>>,
        E: From<Error>,
    {
        self.download_and_read(status, |file| read(BufReader::new(file).lines()))
            .await
    }
}

/// Temporary file path that is deleted on drop
struct ScopedTempFile(Option<TempPath>);

impl ScopedTempFile {
    fn new() -> Result<Self> {
        let path = tempfile::Builder::new()
            .prefix("branch-export-")
            .suffix(".tmp")
            .tempfile()?
            .into_temp_path();
        Ok(Self(Some(path)))
    }

    fn path(&self) -> &Path {
        self.0.as_deref().unwrap_or_else(|| Path::new(""))
    }
}

impl Drop for ScopedTempFile {
    fn drop(&mut self) {
        let Some(temp) = self.0.take() else {
            return;
        };
        let path = temp.to_path_buf();
        if let Err(e) = temp.close() {
            warn!(error = %e, path = %path.display(), "failed to delete temporary export file");
        }
    }
}

// Body read errors arrive wrapped in io::Error by the stream reader
fn copy_error(e: std::io::Error, path: &Path) -> Error {
    if e.get_ref().is_some_and(|inner| inner.is::<reqwest::Error>()) {
        if let Some(Ok(source)) = e.into_inner().map(|inner| inner.downcast::<reqwest::Error>()) {
            return Error::Network(*source);
        }
        return Error::Io(std::io::Error::other(format!(
            "failed to download into '{}'",
            path.display()
        )));
    }
    io_context(e, "write", path)
}

fn io_context(e: std::io::Error, action: &str, path: &Path) -> Error {
    Error::Io(std::io::Error::new(
        e.kind(),
        format!("failed to {action} '{}': {e}", path.display()),
    ))
}
