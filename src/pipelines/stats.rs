use serde::Serialize;
use std::time::{Duration, Instant};

/// Timing for one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    /// Wall time from column detection to the finished summary.
    pub total_time: Duration,
    pub rows_processed: usize,
}

impl PipelineStats {
    pub(crate) fn start() -> PipelineStatsBuilder {
        PipelineStatsBuilder {
            start_time: Instant::now(),
        }
    }

    /// Rows per second, or 0 when the run took no measurable time.
    pub fn rows_per_second(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs > 0.0 {
            self.rows_processed as f64 / secs
        } else {
            0.0
        }
    }
}

pub(crate) struct PipelineStatsBuilder {
    start_time: Instant,
}

impl PipelineStatsBuilder {
    pub fn finish(self, rows_processed: usize) -> PipelineStats {
        PipelineStats {
            total_time: self.start_time.elapsed(),
            rows_processed,
        }
    }
}
