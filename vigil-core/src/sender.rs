use async_trait::async_trait;

use crate::{Message, VigilError};

/// Outbound delivery of rendered reports.
#[async_trait]
pub trait ReportSender: Send + Sync {
    /// A stable identifier used in delivery errors and logs.
    fn name(&self) -> &'static str;

    /// Deliver one message.
    async fn send(&self, message: &Message) -> Result<(), VigilError>;
}
