use std::sync::Arc;
use std::time::Duration;

use vigil::{Agent, Vigil, VigilError};
use vigil_mock::MockConnector;

fn vigil() -> Vigil {
    Vigil::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap()
}

#[tokio::test]
async fn fixture_availability_keeps_raw_status_and_channel() {
    let got = vigil()
        .availability(&Agent::new("1003", "Sam Ortiz"))
        .await
        .unwrap();
    assert_eq!(got.status, "away");
    assert_eq!(got.via.as_deref(), Some("web"));
}

#[tokio::test]
async fn unknown_agent_is_not_found() {
    let err = vigil()
        .availability(&Agent::new("9999", "Nobody"))
        .await
        .unwrap_err();
    assert_eq!(err, VigilError::not_found("availability for 9999"));
}

#[tokio::test]
async fn forced_failure_is_reported_per_connector() {
    let err = vigil()
        .availability(&Agent::new("FAIL", "Broken"))
        .await
        .unwrap_err();
    match err {
        VigilError::AllProvidersFailed(errs) => {
            assert_eq!(errs.len(), 1);
            assert!(matches!(
                &errs[0],
                VigilError::Connector { connector, .. } if connector == "vigil-mock"
            ));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn slow_fixture_trips_the_provider_timeout() {
    let err = vigil()
        .availability(&Agent::new("TIMEOUT", "Slow"))
        .await
        .unwrap_err();
    assert!(matches!(err, VigilError::AllProvidersTimedOut { .. }));
}
