use std::fmt::Debug;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub trait OutputWriter: Debug + Sync + Send {
    fn writer_for_member(&self, member_name: &str) -> anyhow::Result<impl Write>;
    /// Whether this output can be considered a no-op and therefore that any code that only writes to the output can be skipped.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Writes one file per archive member into an output directory.
#[derive(Debug)]
pub struct FileOutputWriter {
    directory_path: PathBuf,
}

impl FileOutputWriter {
    /// Creates the output directory when it does not exist yet.
    pub fn create(directory_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let directory_path = directory_path.into();
        std::fs::create_dir_all(&directory_path)?;
        Ok(Self { directory_path })
    }

    pub fn directory_path(&self) -> &Path {
        &self.directory_path
    }
}

impl OutputWriter for FileOutputWriter {
    fn writer_for_member(&self, member_name: &str) -> anyhow::Result<impl Write> {
        Ok(BufWriter::new(File::create(
            self.directory_path.join(member_name),
        )?))
    }
}

impl OutputWriter for &FileOutputWriter {
    fn writer_for_member(&self, member_name: &str) -> anyhow::Result<impl Write> {
        <FileOutputWriter as OutputWriter>::writer_for_member(self, member_name)
    }
}

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutputWriter;

impl OutputWriter for SinkOutputWriter {
    fn writer_for_member(&self, _member_name: &str) -> anyhow::Result<impl Write> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        true
    }
}
