use std::time::Duration;

use vigil_core::VigilError;

use crate::ZendeskConnector;
use crate::adapter::RealAdapter;

/// Account credentials and endpoint for the Zendesk REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZendeskCredentials {
    /// Account subdomain, the `acme` in `acme.zendesk.com`.
    pub subdomain: String,
    /// Login email for basic auth.
    pub email: String,
    /// Password or API token for basic auth.
    pub password: String,
    /// Explicit API base, overriding the subdomain-derived URL.
    pub base_url: Option<String>,
    /// HTTP timeout for every request.
    pub timeout: Duration,
}

impl ZendeskCredentials {
    /// API base URL, always ending with `/`.
    #[must_use]
    pub fn api_base(&self) -> String {
        let mut base = self
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.zendesk.com/api/v2/", self.subdomain));
        if !base.ends_with('/') {
            base.push('/');
        }
        base
    }
}

/// Builder for [`ZendeskConnector`].
#[derive(Debug, Default)]
pub struct ZendeskConnectorBuilder {
    subdomain: Option<String>,
    email: Option<String>,
    password: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ZendeskConnectorBuilder {
    /// Account subdomain.
    #[must_use]
    pub fn subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = Some(subdomain.into());
        self
    }

    /// Login email.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Password or API token.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Override the API base URL (mock servers, proxies).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// HTTP timeout per request. Defaults to 10 seconds.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the collected settings into credentials.
    ///
    /// # Errors
    /// Returns `VigilError::Config` when email or password is missing, or when
    /// neither a subdomain nor a base URL is set.
    pub fn credentials(self) -> Result<ZendeskCredentials, VigilError> {
        let email = non_empty(self.email, "zendesk email")?;
        let password = non_empty(self.password, "zendesk password")?;
        let subdomain = self.subdomain.unwrap_or_default();
        if subdomain.trim().is_empty() && self.base_url.is_none() {
            return Err(VigilError::Config(
                "zendesk subdomain or base_url is required".into(),
            ));
        }
        Ok(ZendeskCredentials {
            subdomain,
            email,
            password,
            base_url: self.base_url,
            timeout: self.timeout.unwrap_or(Duration::from_secs(10)),
        })
    }

    /// Build the connector.
    ///
    /// # Errors
    /// Returns `VigilError::Config` for incomplete settings, or a connector
    /// error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ZendeskConnector, VigilError> {
        let creds = self.credentials()?;
        let adapter = RealAdapter::new(&creds)?;
        Ok(ZendeskConnector::from_adapter(&adapter))
    }
}

fn non_empty(value: Option<String>, what: &str) -> Result<String, VigilError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(VigilError::Config(format!("{what} is required"))),
    }
}

impl ZendeskConnector {
    /// Returns an empty builder.
    #[must_use]
    pub fn builder() -> ZendeskConnectorBuilder {
        ZendeskConnectorBuilder::default()
    }
}
