use crate::common::errors::AppError;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const CONTENT_XML: &str = "content.xml";
pub const MIMETYPE: &str = "mimetype";

pub struct OdtArchive {
    zip: ZipArchive<File>,
}

pub struct OdtFile;

impl OdtFile {
    pub fn open(path: &Path) -> Result<OdtArchive, AppError> {
        if !path.is_file() {
            return Err(AppError::FileNotFound(path.display().to_string()));
        }
        let file = File::open(path)?;
        let zip = ZipArchive::new(file)
            .map_err(|e| AppError::InvalidOdtFormat(format!("{}: {e}", path.display())))?;
        Ok(OdtArchive { zip })
    }

    pub fn mimetype(path: &Path) -> Result<Option<String>, AppError> {
        let mut archive = Self::open(path)?;
        if !archive.contains(MIMETYPE) {
            return Ok(None);
        }
        Ok(Some(archive.read_entry_string(MIMETYPE)?.trim().to_string()))
    }

    // Copies src to dst entry by entry (raw), swapping in new bytes for replaced_name.
    pub fn rewrite(
        src: &Path,
        dst: &Path,
        replaced_name: &str,
        replaced_content: &[u8],
    ) -> Result<(), AppError> {
        let mut source = Self::open(src)?;
        // Fail before the destination exists.
        if !source.contains(replaced_name) {
            return Err(AppError::EntryNotFound(replaced_name.to_string()));
        }

        let out = File::create(dst)?;
        let mut writer = ZipWriter::new(out);

        for i in 0..source.zip.len() {
            let entry = source.zip.by_index_raw(i)?;
            if entry.name() != replaced_name {
                writer.raw_copy_file(entry)?;
                continue;
            }

            let name = entry.name().to_string();
            let method = match entry.compression() {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            drop(entry);

            debug!("replacing entry {name} ({} bytes)", replaced_content.len());
            writer.start_file(name, SimpleFileOptions::default().compression_method(method))?;
            writer.write_all(replaced_content)?;
        }

        writer.finish()?;
        Ok(())
    }
}

impl OdtArchive {
    pub fn contains(&self, name: &str) -> bool {
        self.zip.index_for_name(name).is_some()
    }

    pub fn entry_names(&self) -> Vec<String> {
        self.zip.file_names().map(str::to_string).collect()
    }

    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, AppError> {
        let mut entry = match self.zip.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(AppError::EntryNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    pub fn read_entry_string(&mut self, name: &str) -> Result<String, AppError> {
        let bytes = self.read_entry(name)?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::InvalidOdtFormat(format!("{name} is not utf-8: {e}")))
    }
}
