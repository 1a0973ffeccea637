use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::errors::{DatasetError, DatasetResult};
use crate::export::{to_csv_records, to_markdown, ReportData};
use crate::services::DatasetService;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Csv,
}

impl ReportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ReportFormat::Markdown => "text/markdown; charset=utf-8",
            ReportFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(format!("Unsupported report format: {}", s)),
        }
    }
}

/// A report rendered on demand, never stored
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedReport {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

pub struct ReportService {
    datasets: DatasetService,
}

impl ReportService {
    pub fn new(datasets: DatasetService) -> Self {
        Self { datasets }
    }

    #[instrument(skip(self))]
    pub async fn render(&self, id: i32, format: ReportFormat) -> DatasetResult<RenderedReport> {
        let detail = self.datasets.detail(id).await?;

        let body = match format {
            ReportFormat::Markdown => {
                let data = ReportData::build(&detail.dataset, &detail.type_summaries, &detail.records);
                to_markdown::render(&data)
            }
            ReportFormat::Csv => to_csv_records::render(&detail.records),
        }
        .map_err(|e| DatasetError::Export(e.to_string()))?;

        debug!("Rendered {} report for dataset {} ({} bytes)", format, id, body.len());

        Ok(RenderedReport {
            filename: report_filename(&detail.dataset.filename, id, format),
            content_type: format.content_type(),
            body,
        })
    }
}

/// `<stem>_report_<id>.<ext>`, stem restricted to filename-safe characters
fn report_filename(source: &str, id: i32, format: ReportFormat) -> String {
    let stem = source
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(source);
    let stem: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "dataset".to_string() } else { stem };
    format!("{}_report_{}.{}", stem, id, format.extension())
}
