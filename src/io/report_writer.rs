use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::ReportError;
use crate::aggregate::{AggregationReport, ReportWindow};
use crate::domain::{to_tib, to_tib_string};
use crate::engine::RunStats;

const COLUMN_GAP: usize = 4;
const TOTAL_LABEL: &str = "Total Datacap";

/// Output layout for an aggregation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Aligned text columns with a trailing total row
    #[default]
    Table,
    /// `client,provider,bytes,tib` rows plus a `total` row
    Csv,
    /// Rows, totals, window and counters as one JSON document
    Json,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    client: &'a str,
    provider: &'a str,
    bytes: i64,
    tib: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    rows: Vec<JsonRow<'a>>,
    total_bytes: i64,
    total_tib: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    window: Option<ReportWindow>,
    stats: RunStats,
}

/// Write an aggregation report and flush the writer
pub async fn write_report<W>(
    report: &AggregationReport,
    format: ReportFormat,
    mut writer: W,
) -> Result<(), ReportError>
where
    W: AsyncWrite + Unpin + Send,
{
    let rendered = match format {
        ReportFormat::Table => render_table(report).into_bytes(),
        ReportFormat::Csv => render_csv(report)?,
        ReportFormat::Json => render_json(report)?,
    };

    writer.write_all(&rendered).await?;
    writer.flush().await?;
    Ok(())
}

fn render_table(report: &AggregationReport) -> String {
    let client_width = report
        .rows
        .iter()
        .map(|r| r.client.len())
        .chain([TOTAL_LABEL.len(), "client".len()])
        .max()
        .unwrap_or_default()
        + COLUMN_GAP;
    let provider_width = report
        .rows
        .iter()
        .map(|r| r.provider.len())
        .chain(["provider".len()])
        .max()
        .unwrap_or_default()
        + COLUMN_GAP;

    let mut out = format!(
        "{:<cw$}{:<pw$}{}\n",
        "client",
        "provider",
        "datacap(TiB)",
        cw = client_width,
        pw = provider_width
    );
    for row in &report.rows {
        out.push_str(&format!(
            "{:<cw$}{:<pw$}{}\n",
            row.client,
            row.provider,
            to_tib_string(row.bytes),
            cw = client_width,
            pw = provider_width
        ));
    }
    out.push_str(&format!(
        "{:<cw$}{:<pw$}{}\n",
        TOTAL_LABEL,
        "",
        to_tib_string(report.total_bytes),
        cw = client_width,
        pw = provider_width
    ));
    out
}

fn render_csv(report: &AggregationReport) -> Result<Vec<u8>, ReportError> {
    let mut csv = csv::Writer::from_writer(Vec::new());

    csv.write_record(["client", "provider", "bytes", "tib"])?;
    for row in &report.rows {
        let bytes = row.bytes.to_string();
        let tib = to_tib_string(row.bytes);
        csv.write_record([&row.client, &row.provider, &bytes, &tib])?;
    }
    let total_bytes = report.total_bytes.to_string();
    let total_tib = to_tib_string(report.total_bytes);
    csv.write_record(["total", "", total_bytes.as_str(), total_tib.as_str()])?;

    csv.into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}

fn render_json(report: &AggregationReport) -> Result<Vec<u8>, ReportError> {
    let json = JsonReport {
        rows: report
            .rows
            .iter()
            .map(|r| JsonRow {
                client: &r.client,
                provider: &r.provider,
                bytes: r.bytes,
                tib: to_tib(r.bytes),
            })
            .collect(),
        total_bytes: report.total_bytes,
        total_tib: to_tib(report.total_bytes),
        window: report.window,
        stats: report.stats,
    };

    let mut encoded = serde_json::to_vec_pretty(&json)?;
    encoded.push(b'\n');
    Ok(encoded)
}
