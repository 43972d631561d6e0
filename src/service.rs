//! Request handling for CSV uploads.

use crate::admin::{data_dir, UploadStore, VisitorLog};
use crate::core::Result;
use crate::pipelines::review_analysis_pipeline::{AnalysisReport, AnalyzeOptions, ReviewAnalysisPipeline};
use crate::pipelines::sentiment_analysis_pipeline::SentimentAnalysisModel;

/// One uploaded CSV file and what is known about the visitor.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub options: AnalyzeOptions,
    pub client_ip: Option<String>,
    pub city: Option<String>,
}

/// Runs uploads through a [`ReviewAnalysisPipeline`], recording the visit
/// and keeping a copy of the file when those collaborators are configured.
///
/// Logging and storage failures are reported with `tracing::warn!` and never
/// change the analysis result.
pub struct AnalysisService<M: SentimentAnalysisModel> {
    pipeline: ReviewAnalysisPipeline<M>,
    visitor_log: Option<VisitorLog>,
    upload_store: Option<UploadStore>,
}

impl<M: SentimentAnalysisModel> AnalysisService<M> {
    pub fn new(pipeline: ReviewAnalysisPipeline<M>) -> Self {
        Self {
            pipeline,
            visitor_log: None,
            upload_store: None,
        }
    }

    /// Log visits and store uploads under [`data_dir`].
    pub fn with_admin_storage(self) -> Self {
        let dir = data_dir();
        self.with_visitor_log(VisitorLog::new(&dir))
            .with_upload_store(UploadStore::new(&dir))
    }

    pub fn with_visitor_log(mut self, log: VisitorLog) -> Self {
        self.visitor_log = Some(log);
        self
    }

    pub fn with_upload_store(mut self, store: UploadStore) -> Self {
        self.upload_store = Some(store);
        self
    }

    pub fn pipeline(&self) -> &ReviewAnalysisPipeline<M> {
        &self.pipeline
    }

    pub fn handle(&self, request: &UploadRequest) -> Result<AnalysisReport> {
        if let Some(log) = &self.visitor_log {
            if let Err(e) = log.record(request.client_ip.as_deref(), request.city.as_deref()) {
                tracing::warn!(error = %e, "failed to record visit");
            }
        }

        if let Some(store) = &self.upload_store {
            if let Err(e) = store.save(&request.file_name, &request.bytes) {
                tracing::warn!(
                    file = %request.file_name,
                    dir = %store.dir().display(),
                    error = %e,
                    "failed to store upload"
                );
            }
        }

        self.pipeline.analyze_csv(&request.bytes, &request.options)
    }
}
