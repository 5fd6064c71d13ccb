use crate::errors::ArchiveError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// The downloaded HIPE archive: one CSV member per machine.
pub struct SensorArchive {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl SensorArchive {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let path = path.into();
        let file = File::open(&path).map_err(|source| ArchiveError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let archive =
            ZipArchive::new(BufReader::new(file)).map_err(|source| ArchiveError::Malformed {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self { path, archive })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the sensor CSV members, in archive order.
    pub fn sensor_file_names(&self) -> Vec<String> {
        self.archive
            .file_names()
            .filter(|name| name.ends_with(".csv"))
            .map(String::from)
            .collect()
    }

    pub fn read_member(&mut self, member_name: &str) -> Result<impl Read + '_, ArchiveError> {
        self.archive
            .by_name(member_name)
            .map_err(|source| ArchiveError::Member {
                member: member_name.to_string(),
                source,
            })
    }
}

/// Zip up the files below `directory` (stored relative to it, like
/// `shutil.make_archive` does) into `zip_path`.
pub fn compress_directory(directory: &Path, zip_path: &Path) -> anyhow::Result<()> {
    let file = File::create(zip_path)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default();

    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative_path = entry.path().strip_prefix(directory)?;
        writer.start_file(relative_path.to_string_lossy().into_owned(), options)?;
        let mut source = File::open(entry.path())?;
        std::io::copy(&mut source, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}
