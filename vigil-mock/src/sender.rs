use async_trait::async_trait;
use tokio::sync::Mutex;

use vigil_core::{Message, ReportSender, VigilError};

/// Report sender that keeps every delivered message in memory.
///
/// Can be switched into a failing mode to exercise delivery error paths.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<Message>>,
    failure: Mutex<Option<String>>,
}

impl RecordingSender {
    /// Sender that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail with `msg`; `None` restores success.
    pub async fn fail_with(&self, msg: Option<&str>) {
        *self.failure.lock().await = msg.map(str::to_string);
    }

    /// Messages delivered so far, in order.
    pub async fn sent(&self) -> Vec<Message> {
        self.sent.lock().await.clone()
    }

    /// Drain and return delivered messages.
    pub async fn take(&self) -> Vec<Message> {
        std::mem::take(&mut *self.sent.lock().await)
    }
}

#[async_trait]
impl ReportSender for RecordingSender {
    fn name(&self) -> &'static str {
        "vigil-recording"
    }

    async fn send(&self, message: &Message) -> Result<(), VigilError> {
        if let Some(msg) = self.failure.lock().await.clone() {
            return Err(VigilError::delivery(self.name(), msg));
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}
