use serde::Serialize;

use super::table::{AggregationTable, TableRow};
use crate::domain::EpochWindow;
use crate::engine::RunStats;

/// Final output of an aggregation run: data rows, grand total, and run
/// counters kept apart from the rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationReport {
    pub rows: Vec<TableRow>,
    pub total_bytes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<ReportWindow>,
    pub stats: RunStats,
}

/// Epoch range the report covers; absent in pending mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    pub start_epoch: i64,
    pub end_epoch: i64,
}

impl From<EpochWindow> for ReportWindow {
    fn from(window: EpochWindow) -> Self {
        Self {
            start_epoch: window.start(),
            end_epoch: window.end(),
        }
    }
}

impl AggregationReport {
    pub fn build(
        table: &AggregationTable,
        client_order: &[String],
        provider_order: &[String],
        stats: RunStats,
    ) -> Self {
        Self {
            rows: table.snapshot(client_order, provider_order),
            total_bytes: table.total(),
            window: None,
            stats,
        }
    }

    pub fn with_window(mut self, window: Option<EpochWindow>) -> Self {
        self.window = window.map(ReportWindow::from);
        self
    }
}
