use std::sync::Arc;
use std::time::Duration;

use vigil::{PresenceConnector, Vigil, VigilError};
use vigil_mock::{DynamicMockConnector, MockBehavior};

use crate::helpers::{MISTY, misty, rig};

#[tokio::test(start_paused = true)]
async fn hanging_provider_times_out_and_next_one_answers() {
    let (slow, slow_ctl) = DynamicMockConnector::new_with_controller("slow");
    let (fast, fast_ctl) = DynamicMockConnector::new_with_controller("fast");
    slow_ctl
        .set_availability_behavior(MISTY, MockBehavior::Hang)
        .await;
    fast_ctl.set_status(MISTY, "available").await;

    let vigil = Vigil::builder()
        .with_connector(slow)
        .with_connector(fast)
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let got = vigil.availability(&misty()).await.unwrap();
    assert_eq!(got.status, "available");
}

#[tokio::test(start_paused = true)]
async fn all_hanging_providers_collapse_to_all_timed_out() {
    let (a, a_ctl) = DynamicMockConnector::new_with_controller("a");
    let (b, b_ctl) = DynamicMockConnector::new_with_controller("b");
    a_ctl.set_availability_behavior(MISTY, MockBehavior::Hang).await;
    b_ctl.set_availability_behavior(MISTY, MockBehavior::Hang).await;

    let vigil = Vigil::builder()
        .with_connector(a)
        .with_connector(b)
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = vigil.availability(&misty()).await.unwrap_err();
    assert_eq!(
        err,
        VigilError::AllProvidersTimedOut {
            capability: "availability".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn request_deadline_aborts_the_poll_pass() {
    let r = rig(&[misty()], |b| {
        b.provider_timeout(Duration::from_secs(60))
            .request_timeout(Duration::from_millis(100))
    });
    r.ctl.set_availability_behavior(MISTY, MockBehavior::Hang).await;

    let err = r.vigil.poll().await.unwrap_err();
    assert_eq!(err, VigilError::request_timeout("poll"));
    assert!(r.stack(MISTY).await.is_empty());
}

struct Silent;

impl PresenceConnector for Silent {
    fn name(&self) -> &'static str {
        "silent"
    }
}

#[tokio::test]
async fn connector_without_the_role_is_unsupported() {
    let vigil = Vigil::builder()
        .with_connector(Arc::new(Silent))
        .build()
        .unwrap();

    let err = vigil.availability(&misty()).await.unwrap_err();
    assert_eq!(err, VigilError::unsupported("availability"));
    let err = vigil.roster().await.unwrap_err();
    assert_eq!(err, VigilError::unsupported("roster"));
}
