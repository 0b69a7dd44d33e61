use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{info, warn};

use crate::clock::{Clock, format_iso_date};
use crate::endpoint::ExportEndpoint;
use crate::error::ConsoleError;
use crate::models::ReportKind;
use crate::report::ReportPeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn path_segment(self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn from_name(name: &str) -> Option<ExportFormat> {
        match name.trim().to_ascii_lowercase().as_str() {
            "excel" | "xlsx" => Some(ExportFormat::Excel),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Destination for downloaded files.
pub trait FileSink: Send + Sync {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ConsoleError>;
}

/// Writes files into one directory, creating it when needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ConsoleError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Keeps saved files in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files
            .lock()
            .map(|files| files.clone())
            .unwrap_or_default()
    }
}

impl FileSink for MemorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ConsoleError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| ConsoleError::Io(std::io::Error::other("memory sink poisoned")))?;
        files.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

/// `report-<slug>-<yyyy-MM-dd>.<ext>`, dated by `clock`.
pub fn file_name(kind: ReportKind, clock: &dyn Clock, format: ExportFormat) -> String {
    format!(
        "report-{}-{}.{}",
        kind.slug(),
        format_iso_date(clock.today()),
        format.extension()
    )
}

/// Downloads a rendered report and hands it to `sink`.
pub async fn export_report<E: ExportEndpoint>(
    endpoint: &E,
    kind: ReportKind,
    period: Option<&ReportPeriod>,
    format: ExportFormat,
    clock: &dyn Clock,
    sink: &dyn FileSink,
) -> Result<PathBuf, ConsoleError> {
    let bytes = endpoint
        .download(kind, period, format)
        .await
        .inspect_err(|e| warn!("{} export of {} report failed: {}", format, kind, e))?;
    let path = sink.save(&file_name(kind, clock, format), &bytes)?;
    info!("Saved {} report ({} bytes) to {}", kind, bytes.len(), path.display());
    Ok(path)
}
