//! Résumé attachments.
//!
//! The core only decides whether an upload is acceptable. Keeping the bytes
//! is the job of an [`AttachmentStore`] backend; the lead record holds just
//! the name the backend hands back.

use std::{future::Future, path::Path};

use bytes::Bytes;

use crate::validate::FieldError;

/// Default upper bound on a résumé, in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5_000_000;

/// Extensions accepted for résumés (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// A file received with an intake submission.
#[derive(Debug, Clone)]
pub struct Upload {
  /// The client-supplied file name; only its extension is trusted.
  pub file_name:    String,
  pub content_type: Option<String>,
  pub bytes:        Bytes,
}

impl Upload {
  /// Lower-cased extension of `file_name`, if it has one.
  pub fn extension(&self) -> Option<String> {
    Path::new(&self.file_name)
      .extension()
      .and_then(|e| e.to_str())
      .map(str::to_ascii_lowercase)
  }

  /// Check type and size; reported against the `resume` field.
  pub fn check(&self, max_bytes: usize) -> Result<(), FieldError> {
    let allowed = self
      .extension()
      .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    if !allowed {
      return Err(FieldError::new(
        "resume",
        "Résumé must be a PDF, DOC or DOCX file.",
      ));
    }
    if self.bytes.is_empty() {
      return Err(FieldError::new("resume", "Résumé file is empty."));
    }
    if self.bytes.len() > max_bytes {
      return Err(FieldError::new(
        "resume",
        format!("Résumé must be at most {max_bytes} bytes."),
      ));
    }
    Ok(())
  }
}

/// Abstraction over wherever attachment bytes end up.
pub trait AttachmentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist an already-checked upload and return the name it was stored
  /// under. Names are unique per backend.
  fn save(
    &self,
    upload: Upload,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;
}
