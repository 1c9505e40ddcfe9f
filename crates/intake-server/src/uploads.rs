//! Résumé storage on the local filesystem.

use std::path::{Path, PathBuf};

use intake_core::attachment::{AttachmentStore, Upload};
use tokio::{fs, io::AsyncWriteExt as _};
use uuid::Uuid;

/// Writes each upload to `dir` under a fresh `resume-<uuid>.<ext>` name.
#[derive(Debug, Clone)]
pub struct DiskAttachments {
  dir: PathBuf,
}

impl DiskAttachments {
  /// Use `dir` for uploads, creating it if it does not exist.
  pub async fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
    let dir = dir.into();
    fs::create_dir_all(&dir).await?;
    Ok(Self { dir })
  }

  pub fn dir(&self) -> &Path { &self.dir }
}

impl AttachmentStore for DiskAttachments {
  type Error = std::io::Error;

  async fn save(&self, upload: Upload) -> Result<String, Self::Error> {
    let ext  = upload.extension().unwrap_or_else(|| "bin".to_string());
    let name = format!("resume-{}.{ext}", Uuid::new_v4().simple());
    let path = self.dir.join(&name);

    // `create_new` refuses to clobber an existing file.
    let mut file = fs::OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&path)
      .await?;
    file.write_all(&upload.bytes).await?;
    file.flush().await?;

    tracing::info!(file = %name, bytes = upload.bytes.len(), "resume stored");
    Ok(name)
  }
}
