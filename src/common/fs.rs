use crate::common::errors::AppError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Odt,
    Pdf,
}

pub struct FsUtil;

impl FsUtil {
    // Normalizes relative paths against the working directory.
    pub fn resolve_path(path: &str) -> Result<PathBuf, AppError> {
        if path.trim().is_empty() {
            return Err(AppError::InvalidPath("path is empty".to_string()));
        }
        let input = Path::new(path);
        if input.is_absolute() {
            Ok(input.to_path_buf())
        } else {
            Ok(std::env::current_dir()?.join(input))
        }
    }

    pub fn resolve_template_path(path: &str) -> Result<PathBuf, AppError> {
        let abs = Self::resolve_path(path)?;
        if !abs.is_file() {
            return Err(AppError::FileNotFound(abs.display().to_string()));
        }
        Ok(abs)
    }

    // Resolves an output path and whether the caller wants the ODT or a PDF from it.
    pub fn resolve_output_path(path: &str) -> Result<(PathBuf, OutputKind), AppError> {
        let abs = Self::resolve_path(path)?;
        let kind = match Self::extension(&abs).as_str() {
            "odt" => OutputKind::Odt,
            "pdf" => OutputKind::Pdf,
            _ => {
                return Err(AppError::InvalidPath(format!(
                    "expected .odt or .pdf extension: {}",
                    abs.display()
                )))
            }
        };
        Ok((abs, kind))
    }

    pub fn sibling_odt(pdf_path: &Path) -> PathBuf {
        pdf_path.with_extension("odt")
    }

    // Concurrent renders must never share a scratch file.
    pub fn unique_temp_odt(dir: &Path) -> PathBuf {
        dir.join(format!("invoice_{}.odt", Uuid::new_v4().simple()))
    }

    pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn extension(path: &Path) -> String {
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}
