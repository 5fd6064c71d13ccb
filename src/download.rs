use crate::dataset::HIPE_URL;
use crate::errors::DownloadError;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn archive_url(archive_name: &str) -> String {
    format!("{HIPE_URL}{archive_name}")
}

/// Make sure the HIPE archive sits in the data directory, downloading it
/// from the companion website when it is missing.
pub fn ensure_archive(data_dir: &Path, archive_name: &str) -> Result<PathBuf, DownloadError> {
    let archive_path = data_dir.join(archive_name);
    if archive_path.is_file() {
        info!("Found '{archive_name}'.");
        return Ok(archive_path);
    }

    info!("File '{archive_name}' missing. Downloading...");
    download(&archive_url(archive_name), &archive_path)?;
    info!("File '{archive_name}' downloaded.");
    Ok(archive_path)
}

fn download(url: &str, target: &Path) -> Result<(), DownloadError> {
    let response = ureq::get(url)
        .call()
        .map_err(|source| DownloadError::Request {
            url: url.to_string(),
            source: Box::new(source),
        })?;

    let write_error = |source| DownloadError::Write {
        path: target.display().to_string(),
        source,
    };
    let mut writer = BufWriter::new(File::create(target).map_err(write_error)?);
    std::io::copy(&mut response.into_reader(), &mut writer).map_err(write_error)?;
    Ok(())
}
