//! Report rendering and file output.

pub mod export;
pub mod markdown;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::config::ReportFormat;
use crate::screen::ScreenReport;

pub use export::{export_csv, export_json, import_json, ExportError};
pub use markdown::render_markdown;

/// `sector-report-<theme>-<YYYYMMDD>.<ext>`
pub fn report_filename(theme: &str, as_of: NaiveDate, format: ReportFormat) -> String {
    format!(
        "sector-report-{theme}-{}.{}",
        as_of.format("%Y%m%d"),
        format.extension()
    )
}

pub fn render(report: &ScreenReport, format: ReportFormat) -> Result<String, ExportError> {
    match format {
        ReportFormat::Md => Ok(render_markdown(report)),
        ReportFormat::Json => export_json(report),
        ReportFormat::Csv => export_csv(report),
    }
}

/// Write one file per format into `dir`, creating it if needed.
pub fn write_reports(
    report: &ScreenReport,
    dir: &Path,
    formats: &[ReportFormat],
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = dir.join(report_filename(&report.theme, report.as_of, format));
        let content = render(report, format)?;
        std::fs::write(&path, content).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "report written");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_contract() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        assert_eq!(
            report_filename("半導體", d, ReportFormat::Md),
            "sector-report-半導體-20260220.md"
        );
        assert_eq!(
            report_filename("AI", d, ReportFormat::Csv),
            "sector-report-AI-20260220.csv"
        );
    }
}
