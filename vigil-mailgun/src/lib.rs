//! vigil-mailgun
//!
//! `ReportSender` that delivers rendered reports through the Mailgun
//! messages API.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "test-adapters")]
use adapter::CloneArcAdapters;
use adapter::{FormFields, MgMessages, RealAdapter};
use async_trait::async_trait;
use vigil_core::{Message, ReportSender, VigilError};

#[cfg(feature = "test-adapters")]
type MessagesAdapter = Arc<dyn MgMessages>;
#[cfg(not(feature = "test-adapters"))]
type MessagesAdapter = Arc<RealAdapter>;

/// Mailgun account, sending domain and recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailgunSettings {
    /// Private API key.
    pub api_key: String,
    /// Sending domain registered with Mailgun.
    pub domain: String,
    /// `From` address.
    pub from: String,
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// API root; defaults to `https://api.mailgun.net`.
    pub api_base: String,
    /// HTTP timeout per request.
    pub timeout: Duration,
}

impl MailgunSettings {
    /// Default API root.
    pub const DEFAULT_API_BASE: &'static str = "https://api.mailgun.net";

    /// Settings with the default API root and a 10 second timeout.
    pub fn new(
        api_key: impl Into<String>,
        domain: impl Into<String>,
        from: impl Into<String>,
        to: Vec<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            domain: domain.into(),
            from: from.into(),
            to,
            cc: Vec::new(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Full messages endpoint: `{api_base}/v3/{domain}/messages`.
    #[must_use]
    pub fn messages_url(&self) -> String {
        format!(
            "{}/v3/{}/messages",
            self.api_base.trim_end_matches('/'),
            self.domain
        )
    }

    fn validate(&self) -> Result<(), VigilError> {
        if self.api_key.trim().is_empty() {
            return Err(VigilError::Config("mailgun api_key is required".into()));
        }
        if self.domain.trim().is_empty() {
            return Err(VigilError::Config("mailgun domain is required".into()));
        }
        if self.to.is_empty() {
            return Err(VigilError::Config(
                "mailgun needs at least one recipient".into(),
            ));
        }
        Ok(())
    }
}

/// Report sender backed by Mailgun.
pub struct MailgunSender {
    messages: MessagesAdapter,
    from: String,
    to: Vec<String>,
    cc: Vec<String>,
}

impl MailgunSender {
    /// Build a sender with a fresh HTTP client.
    ///
    /// # Errors
    /// Returns `VigilError::Config` for incomplete settings.
    pub fn try_new(settings: &MailgunSettings) -> Result<Self, VigilError> {
        settings.validate()?;
        let a = RealAdapter::new(settings)?;
        Ok(Self::from_adapter(&a, settings))
    }

    /// For tests/injection (requires the `test-adapters` feature).
    #[cfg(feature = "test-adapters")]
    pub fn from_adapter<A: CloneArcAdapters + 'static>(
        adapter: &A,
        settings: &MailgunSettings,
    ) -> Self {
        Self {
            messages: adapter.clone_arc_messages(),
            from: settings.from.clone(),
            to: settings.to.clone(),
            cc: settings.cc.clone(),
        }
    }

    #[cfg(not(feature = "test-adapters"))]
    /// Build from a concrete `RealAdapter`.
    pub fn from_adapter(adapter: &RealAdapter, settings: &MailgunSettings) -> Self {
        Self {
            messages: Arc::new(adapter.clone()),
            from: settings.from.clone(),
            to: settings.to.clone(),
            cc: settings.cc.clone(),
        }
    }

    fn fields(&self, message: &Message) -> FormFields {
        let mut fields: FormFields = vec![("from", self.from.clone())];
        fields.extend(self.to.iter().map(|t| ("to", t.clone())));
        fields.extend(self.cc.iter().map(|c| ("cc", c.clone())));
        fields.push(("subject", message.subject.clone()));
        fields.push(("text", message.text.clone()));
        if let Some(html) = &message.html {
            fields.push(("html", html.clone()));
        }
        fields
    }
}

#[async_trait]
impl ReportSender for MailgunSender {
    fn name(&self) -> &'static str {
        "vigil-mailgun"
    }

    async fn send(&self, message: &Message) -> Result<(), VigilError> {
        self.messages
            .submit(self.fields(message))
            .await
            .map_err(|e| match e {
                VigilError::Other(msg) => VigilError::delivery("vigil-mailgun", msg),
                other => other,
            })
    }
}
