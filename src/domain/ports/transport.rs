use crate::domain::error::DomainError;

/// A rendered report ready for delivery.
#[derive(Debug, Clone)]
pub struct OutgoingReport {
    pub subject: String,
    pub plain: String,
    pub html: String,
}

/// Delivers a rendered report. Reports are plain values, so a failed
/// delivery can be retried without rerunning the pipeline.
pub trait ReportTransport: Send + Sync {
    fn name(&self) -> &str;

    fn deliver(&self, report: &OutgoingReport) -> Result<(), DomainError>;
}
