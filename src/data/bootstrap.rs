// src/data/bootstrap.rs

use std::fs;
use std::path::Path;
use anyhow::{Result, Context, anyhow};
use log::info;

/// Fetches and unpacks the pre-processed data bundle the first time the
/// application runs. Does nothing when the data directory already exists.
///
/// The archive is opened and validated before anything is extracted, so a
/// truncated download fails here without touching existing data. There is no
/// retry: a failed download aborts startup and the process must be restarted
/// once the network is back.
pub fn ensure_data(data_dir: &Path, bundle_url: &str) -> Result<()> {
    if data_dir.exists() {
        return Ok(());
    }

    let parent = data_dir
        .parent()
        .ok_or_else(|| anyhow!("Invalid data directory: {}", data_dir.display()))?;
    let zip_path = parent.join("dados.zip");

    info!("Preparando o ambiente pela primeira vez. Baixando {}...", bundle_url);
    download(bundle_url, &zip_path)?;

    info!("Descompactando arquivos...");
    let result = extract(&zip_path, parent);
    let _ = fs::remove_file(&zip_path);
    result?;

    if !data_dir.exists() {
        return Err(anyhow!(
            "Bundle extracted but data directory {} was not created",
            data_dir.display()
        ));
    }
    info!("Ambiente pronto.");
    Ok(())
}

fn download(url: &str, target: &Path) -> Result<()> {
    let mut response = reqwest::blocking::get(url)
        .with_context(|| format!("Failed to download data bundle from {}", url))?
        .error_for_status()
        .context("Data bundle download was rejected by the server")?;
    let mut file = fs::File::create(target)
        .with_context(|| format!("Failed to create {}", target.display()))?;
    std::io::copy(&mut response, &mut file)
        .context("Failed while writing the data bundle to disk")?;
    Ok(())
}

fn extract(zip_path: &Path, target_dir: &Path) -> Result<()> {
    let file = fs::File::open(zip_path)
        .with_context(|| format!("Failed to open {}", zip_path.display()))?;
    // Validates the archive up front; a corrupt download errors out here.
    let mut archive = zip::ZipArchive::new(file)
        .context("Downloaded data bundle is not a valid zip archive")?;
    archive
        .extract(target_dir)
        .context("Failed to extract the data bundle")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn existing_data_dir_skips_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("dados");
        fs::create_dir(&data_dir).unwrap();
        // URL is never touched when the directory is already present.
        ensure_data(&data_dir, "http://127.0.0.1:1/unreachable.zip").unwrap();
    }

    #[test]
    fn corrupt_archive_is_rejected_before_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("dados.zip");
        let mut file = fs::File::create(&zip_path).unwrap();
        file.write_all(b"definitely not a zip").unwrap();

        let err = extract(&zip_path, dir.path()).unwrap_err();
        assert!(err.to_string().contains("valid zip"));
    }
}
