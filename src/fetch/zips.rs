use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io,
    path::Path,
};
use tracing::{info, warn};
use zip::ZipArchive;

/// Extract `archive` under `dest_dir` unless `data_dir` already exists.
/// Returns whether anything was extracted.
pub fn ensure_extracted(
    archive: impl AsRef<Path>,
    dest_dir: impl AsRef<Path>,
    data_dir: impl AsRef<Path>,
) -> Result<bool> {
    if data_dir.as_ref().is_dir() {
        return Ok(false);
    }
    info!("expanding data");
    extract_archive(archive, dest_dir)?;
    Ok(true)
}

/// Unpack every entry of `zip_path` into `dest_dir`, preserving the
/// archive's directory layout. Entries escaping `dest_dir` are skipped.
#[tracing::instrument(level = "info", skip(zip_path, dest_dir), fields(zip = %zip_path.as_ref().display()))]
pub fn extract_archive(zip_path: impl AsRef<Path>, dest_dir: impl AsRef<Path>) -> Result<usize> {
    let zip_path = zip_path.as_ref();
    let dest_dir = dest_dir.as_ref();

    let file = File::open(zip_path)
        .with_context(|| format!("Failed to open ZIP file: {:?}", zip_path))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("Failed to read ZIP archive: {:?}", zip_path))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to access ZIP entry #{} in {:?}", i, zip_path))?;
        let Some(rel) = entry.enclosed_name() else {
            warn!(name = entry.name(), "skipping entry with unsafe path");
            continue;
        };
        let out_path = dest_dir.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("creating directory {:?}", out_path))?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {:?}", parent))?;
        }
        let mut out = File::create(&out_path)
            .with_context(|| format!("creating file {:?}", out_path))?;
        io::copy(&mut entry, &mut out)
            .with_context(|| format!("extracting {:?}", out_path))?;
        written += 1;
    }

    info!(files = written, "extracted archive");
    Ok(written)
}
