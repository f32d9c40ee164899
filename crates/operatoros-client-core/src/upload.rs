use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::format::format_file_size;

pub const ALLOWED_UPLOAD_TYPES: [&str; 2] = ["text/csv", "application/vnd.ms-excel"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("File size must be less than {}", limit_label(.limit))]
    TooLarge { size: u64, limit: u64 },
    #[error("Only CSV files are allowed")]
    NotCsv,
}

/// `10MB` style: the file size label without its space.
fn limit_label(limit: &u64) -> String {
    format_file_size(*limit).replace(' ', "")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile<'a> {
    pub name: &'a str,
    pub mime_type: &'a str,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    pub name: String,
    pub size: u64,
}

impl UploadSummary {
    #[must_use]
    pub fn label(&self) -> String {
        format!("Selected: {} ({})", self.name, format_file_size(self.size))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadGuard {
    max_bytes: u64,
}

impl UploadGuard {
    #[must_use]
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Size is checked before type, so an oversized file is rejected for
    /// size whatever its extension.
    pub fn check(&self, file: &SelectedFile<'_>) -> Result<UploadSummary, UploadError> {
        if file.size > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: file.size,
                limit: self.max_bytes,
            });
        }
        let allowed_type = ALLOWED_UPLOAD_TYPES.contains(&file.mime_type);
        if !allowed_type && !file.name.ends_with(".csv") {
            return Err(UploadError::NotCsv);
        }
        Ok(UploadSummary {
            name: file.name.to_string(),
            size: file.size,
        })
    }
}

impl Default for UploadGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}
