use thiserror::Error;

#[derive(Debug, Error)]
pub enum HipeError {
    #[error("Could not prepare the data directory '{path}': {source}")]
    DataDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not fetch the HIPE archive: {0}")]
    DownloadFailed(#[from] DownloadError),
    #[error("Could not read the HIPE archive: {0}")]
    ArchiveFailed(#[from] ArchiveError),
    #[error("Could not ingest sensor file: {0}")]
    IngestFailed(#[from] IngestError),
    #[error("Error while extracting features: {0}")]
    ExtractionFailed(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request for '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("could not write downloaded archive to '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("could not open archive '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("archive '{path}' is not a readable zip file: {source}")]
    Malformed {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("archive member '{member}' could not be read: {source}")]
    Member {
        member: String,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("sensor file name '{0}' does not follow the '<machine>_PhaseCount_<n>_...' pattern")]
    MemberName(String),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("file has no '{0}' column")]
    MissingDateColumn(&'static str),
    #[error("row {row}: could not parse '{value}' in column '{column}' as a number")]
    BadValue {
        row: usize,
        column: String,
        value: String,
    },
}
