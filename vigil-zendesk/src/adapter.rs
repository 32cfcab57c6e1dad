#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use vigil_core::{Availability, VigilError};

use crate::builder::ZendeskCredentials;

/// Voice availability abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait ZdAvailability: Send + Sync {
    /// Fetch the raw voice availability for one agent id.
    async fn availability(&self, agent_id: &str) -> Result<Availability, VigilError>;
}

/// User listing abstraction.
#[async_trait]
pub trait ZdUsers: Send + Sync {
    /// Fetch every user visible to the credentials, following pagination.
    async fn users(&self) -> Result<Vec<ZdUser>, VigilError>;
}

/// A Zendesk user as returned by `users.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZdUser {
    /// Numeric user id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Role: `end-user`, `agent` or `admin`.
    #[serde(default)]
    pub role: String,
}

#[derive(Deserialize)]
struct AvailabilityEnvelope {
    availability: AvailabilityBody,
}

#[derive(Deserialize)]
struct AvailabilityBody {
    status: String,
    #[serde(default)]
    via: Option<String>,
}

#[derive(Deserialize)]
struct UsersPage {
    #[serde(default)]
    users: Vec<ZdUser>,
    #[serde(default)]
    next_page: Option<String>,
}

/// Real adapter backed by a shared `reqwest::Client`.
/// `reqwest::Client` is `Clone + Send + Sync`, so no external locking is needed.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    base_url: String,
    email: String,
    password: String,
}

impl RealAdapter {
    /// Build an adapter for the given credentials with a default HTTP client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(creds: &ZendeskCredentials) -> Result<Self, VigilError> {
        let http = reqwest::Client::builder()
            .timeout(creds.timeout)
            .build()
            .map_err(|e| VigilError::connector("vigil-zendesk", e.to_string()))?;
        Ok(Self::with_client(http, creds))
    }

    /// Wrap an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(http: reqwest::Client, creds: &ZendeskCredentials) -> Self {
        Self {
            http,
            base_url: creds.api_base(),
            email: creds.email.clone(),
            password: creds.password.clone(),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        context: &str,
    ) -> Result<T, VigilError> {
        let resp = self
            .http
            .get(url)
            .basic_auth(&self.email, Some(&self.password))
            .send()
            .await
            .map_err(|e| map_transport_err(&e, context))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(map_status(status, context));
        }

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.trim_start().starts_with("application/json"));
        if !is_json {
            return Err(VigilError::Data(format!(
                "response isn't in JSON format: {context}"
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| VigilError::Data(format!("malformed {context}: {e}")))
    }
}

fn map_status(status: StatusCode, context: &str) -> VigilError {
    match status {
        StatusCode::NOT_FOUND => VigilError::not_found(context.to_string()),
        StatusCode::TOO_MANY_REQUESTS => {
            VigilError::connector("vigil-zendesk", format!("rate limit: {context}"))
        }
        s if s.is_server_error() => VigilError::connector(
            "vigil-zendesk",
            format!("server error {}: {context}", s.as_u16()),
        ),
        s => VigilError::connector("vigil-zendesk", format!("status {}: {context}", s.as_u16())),
    }
}

fn map_transport_err(e: &reqwest::Error, context: &str) -> VigilError {
    VigilError::connector("vigil-zendesk", format!("{context}: {e}"))
}

#[async_trait]
impl ZdAvailability for RealAdapter {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "vigil_zendesk::availability", skip(self), fields(agent = %agent_id))
    )]
    async fn availability(&self, agent_id: &str) -> Result<Availability, VigilError> {
        let url = format!(
            "{}channels/voice/availabilities/{agent_id}.json",
            self.base_url
        );
        let env: AvailabilityEnvelope = self
            .get_json(&url, &format!("availability for {agent_id}"))
            .await?;
        Ok(Availability {
            status: env.availability.status,
            via: env.availability.via,
        })
    }
}

#[async_trait]
impl ZdUsers for RealAdapter {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "vigil_zendesk::users", skip(self))
    )]
    async fn users(&self) -> Result<Vec<ZdUser>, VigilError> {
        let mut out = Vec::new();
        let mut next = Some(format!("{}users.json", self.base_url));
        while let Some(url) = next.take() {
            let page: UsersPage = self.get_json(&url, "users").await?;
            out.extend(page.users);
            next = page.next_page.filter(|n| *n != url);
        }
        Ok(out)
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn ZdAvailability {
    /// Build a `ZdAvailability` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn ZdAvailability>
    where
        F: Send + Sync + 'static + Fn(String) -> Result<Availability, VigilError>,
    {
        struct FnAvailability<F>(F);
        #[async_trait]
        impl<F> ZdAvailability for FnAvailability<F>
        where
            F: Send + Sync + 'static + Fn(String) -> Result<Availability, VigilError>,
        {
            async fn availability(&self, agent_id: &str) -> Result<Availability, VigilError> {
                (self.0)(agent_id.to_string())
            }
        }
        Arc::new(FnAvailability(f))
    }
}

#[cfg(feature = "test-adapters")]
impl dyn ZdUsers {
    /// Build a `ZdUsers` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn ZdUsers>
    where
        F: Send + Sync + 'static + Fn() -> Result<Vec<ZdUser>, VigilError>,
    {
        struct FnUsers<F>(F);
        #[async_trait]
        impl<F> ZdUsers for FnUsers<F>
        where
            F: Send + Sync + 'static + Fn() -> Result<Vec<ZdUser>, VigilError>,
        {
            async fn users(&self) -> Result<Vec<ZdUser>, VigilError> {
                (self.0)()
            }
        }
        Arc::new(FnUsers(f))
    }
}

/// Produces shared adapter handles for a connector (tests only).
///
/// Default methods return stubs that fail with `unsupported`, so a test
/// overrides only the endpoints it exercises.
#[cfg(feature = "test-adapters")]
pub trait CloneArcAdapters {
    /// Clone as `Arc<dyn ZdAvailability>`.
    fn clone_arc_availability(&self) -> Arc<dyn ZdAvailability> {
        <dyn ZdAvailability>::from_fn(|_id| Err(VigilError::unsupported("availability")))
    }
    /// Clone as `Arc<dyn ZdUsers>`.
    fn clone_arc_users(&self) -> Arc<dyn ZdUsers> {
        <dyn ZdUsers>::from_fn(|| Err(VigilError::unsupported("roster")))
    }
}

#[cfg(feature = "test-adapters")]
impl CloneArcAdapters for RealAdapter {
    fn clone_arc_availability(&self) -> Arc<dyn ZdAvailability> {
        Arc::new(self.clone()) as Arc<dyn ZdAvailability>
    }
    fn clone_arc_users(&self) -> Arc<dyn ZdUsers> {
        Arc::new(self.clone()) as Arc<dyn ZdUsers>
    }
}
