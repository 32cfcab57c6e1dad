use vigil_core::{Capability, VigilError};

/// Join a collection of tasks and apply an optional request-level deadline.
///
/// This wraps `futures::future::join_all(tasks)` with `crate::core::with_request_deadline`.
/// On timeout, the inner helper returns `VigilError::RequestTimeout("request")` which
/// call sites can remap to a more specific capability label as needed.
///
/// # Errors
/// Returns `RequestTimeout` when the deadline elapses before every task completes.
pub async fn join_with_deadline<I, F, T>(
    tasks: I,
    deadline: Option<std::time::Duration>,
) -> Result<Vec<T>, VigilError>
where
    I: IntoIterator<Item = F>,
    F: core::future::Future<Output = T>,
{
    crate::core::with_request_deadline(deadline, futures::future::join_all(tasks)).await
}

/// Collapse a set of provider errors into a uniform `VigilError` outcome.
///
/// Rules:
/// - If `attempted_any` is false → `Unsupported(capability)`.
/// - If all errors are `ProviderTimeout` → `AllProvidersTimedOut(capability)`.
/// - If `not_found_what` is `Some` and all errors are `NotFound` → `NotFound(what)`.
/// - Else → `AllProvidersFailed(errors)`.
#[must_use]
pub fn collapse_errors(
    capability: Capability,
    attempted_any: bool,
    errors: Vec<VigilError>,
    not_found_what: Option<String>,
) -> VigilError {
    if !attempted_any {
        return VigilError::unsupported(capability.to_string());
    }
    if !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, VigilError::ProviderTimeout { .. }))
    {
        return VigilError::AllProvidersTimedOut {
            capability: capability.to_string(),
        };
    }
    if let Some(what) = not_found_what
        && !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, VigilError::NotFound { .. }))
    {
        return VigilError::not_found(what);
    }
    VigilError::AllProvidersFailed(errors)
}

/// Re-label a pass-level timeout with the capability it interrupted.
pub(crate) fn relabel_timeout(e: VigilError, capability: Capability) -> VigilError {
    match e {
        VigilError::RequestTimeout { .. } => VigilError::request_timeout(capability.as_str()),
        other => other,
    }
}

/// Log a per-agent failure. Errors nobody can act on, such as an agent the
/// provider does not know, stay at debug level.
#[cfg(feature = "tracing")]
pub(crate) fn log_agent_failure(agent: &vigil_core::AgentId, e: &VigilError, what: &str) {
    if e.is_actionable() {
        tracing::warn!(target: "vigil::router", agent = %agent, error = %e, "{what}");
    } else {
        tracing::debug!(target: "vigil::router", agent = %agent, error = %e, "{what}");
    }
}
