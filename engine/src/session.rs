//! Per-session state: the load mode and the counters of the last cycle.

use chrono::{DateTime, Local};

use triad_types::{AggregateResult, LoadMode, SessionCounters, StatusReport};

use crate::reconcile::reconcile;
use crate::view::RenderSink;

#[derive(Debug, Clone, Default)]
pub struct DashboardSession {
    mode: LoadMode,
    counters: SessionCounters,
    last_report: Option<StatusReport>,
}

impl DashboardSession {
    #[must_use]
    pub fn new(mode: LoadMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LoadMode) {
        self.mode = mode;
    }

    /// Switch to the other mode and return it.
    pub fn toggle_mode(&mut self) -> LoadMode {
        self.mode = self.mode.toggle();
        self.mode
    }

    #[must_use]
    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    #[must_use]
    pub fn last_report(&self) -> Option<&StatusReport> {
        self.last_report.as_ref()
    }

    /// Process one settled result: overwrite the counters, then reconcile.
    pub fn apply(
        &mut self,
        result: &AggregateResult,
        sink: &mut impl RenderSink,
        at: DateTime<Local>,
    ) -> StatusReport {
        self.counters = result.counters();
        let report = reconcile(result, sink, at);

        tracing::info!(
            mode = self.mode.as_str(),
            status = %report.status,
            succeeded = self.counters.success_count,
            failed = self.counters.failure_count,
            error = report.error_display(),
            "Load cycle finished"
        );

        self.last_report = Some(report.clone());
        report
    }
}
