#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;

use vigil_core::VigilError;

use crate::MailgunSettings;

/// Form fields of one Mailgun message, in submission order.
///
/// Repeated keys (several `cc` recipients) are allowed.
pub type FormFields = Vec<(&'static str, String)>;

/// Message submission abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait MgMessages: Send + Sync {
    /// Submit one message to the messages endpoint.
    async fn submit(&self, fields: FormFields) -> Result<(), VigilError>;
}

/// Real adapter backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RealAdapter {
    /// Build an adapter for the given settings with a default HTTP client.
    ///
    /// # Errors
    /// Returns a delivery error if the HTTP client cannot be constructed.
    pub fn new(settings: &MailgunSettings) -> Result<Self, VigilError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| VigilError::delivery("vigil-mailgun", e.to_string()))?;
        Ok(Self::with_client(http, settings))
    }

    /// Wrap an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(http: reqwest::Client, settings: &MailgunSettings) -> Self {
        Self {
            http,
            endpoint: settings.messages_url(),
            api_key: settings.api_key.clone(),
        }
    }
}

#[async_trait]
impl MgMessages for RealAdapter {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "vigil_mailgun::submit", skip(self, fields))
    )]
    async fn submit(&self, fields: FormFields) -> Result<(), VigilError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .basic_auth("api", Some(&self.api_key))
            .form(&fields)
            .send()
            .await
            .map_err(|e| VigilError::delivery("vigil-mailgun", e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::OK {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(VigilError::delivery(
            "vigil-mailgun",
            format!("status {}: {}", status.as_u16(), body.trim()),
        ))
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn MgMessages {
    /// Build a `MgMessages` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn MgMessages>
    where
        F: Send + Sync + 'static + Fn(FormFields) -> Result<(), VigilError>,
    {
        struct FnMessages<F>(F);
        #[async_trait]
        impl<F> MgMessages for FnMessages<F>
        where
            F: Send + Sync + 'static + Fn(FormFields) -> Result<(), VigilError>,
        {
            async fn submit(&self, fields: FormFields) -> Result<(), VigilError> {
                (self.0)(fields)
            }
        }
        Arc::new(FnMessages(f))
    }
}

/// Produces shared adapter handles for a sender (tests only).
#[cfg(feature = "test-adapters")]
pub trait CloneArcAdapters {
    /// Clone as `Arc<dyn MgMessages>`.
    fn clone_arc_messages(&self) -> Arc<dyn MgMessages> {
        <dyn MgMessages>::from_fn(|_| Err(VigilError::unsupported("report")))
    }
}

#[cfg(feature = "test-adapters")]
impl CloneArcAdapters for RealAdapter {
    fn clone_arc_messages(&self) -> Arc<dyn MgMessages> {
        Arc::new(self.clone()) as Arc<dyn MgMessages>
    }
}
