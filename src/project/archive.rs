//! Packaging a generated file set: an in-memory zip for download, or a
//! directory tree on disk.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{GeneratedFileSet, GenerationMode};
use crate::utilities::errors::ArchiveError;

/// Build a deflate-compressed zip in memory.
///
/// Every entry is stored under `<project_name>/`, so extracting the archive
/// yields a single top-level directory. Entry order follows the file set.
pub fn create_zip_file(
    files: &GeneratedFileSet,
    project_name: &str,
) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        writer.start_file(format!("{}/{}", project_name, file.path), options)?;
        writer.write_all(file.content.as_bytes())?;
    }

    let bytes = writer.finish()?.into_inner();
    log::debug!(
        "packed {} files for '{}' into {} bytes",
        files.len(),
        project_name,
        bytes.len()
    );
    Ok(bytes)
}

/// Download name for an archive: `<project>_core.zip` for core files,
/// `<project>.zip` for a complete project.
pub fn archive_file_name(project_name: &str, mode: GenerationMode) -> String {
    match mode {
        GenerationMode::CoreFiles => format!("{}_core.zip", project_name),
        GenerationMode::CompleteProject => format!("{}.zip", project_name),
    }
}

/// Write every file under `base_path`, creating parent directories.
///
/// Returns the written paths in file-set order.
pub fn save_project_to_disk(
    files: &GeneratedFileSet,
    base_path: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, ArchiveError> {
    let base_path = base_path.as_ref();
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let target = base_path.join(&file.path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &file.content)?;
        written.push(target);
    }

    log::info!("wrote {} files to {}", written.len(), base_path.display());
    Ok(written)
}
