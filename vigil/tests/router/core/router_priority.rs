use vigil::{Availability, Vigil, VigilError};
use vigil_mock::{DynamicMockConnector, MockBehavior};

use crate::helpers::{MISTY, misty};

#[tokio::test]
async fn registration_order_is_the_default_fallback_order() {
    let (a, a_ctl) = DynamicMockConnector::new_with_controller("a");
    let (b, b_ctl) = DynamicMockConnector::new_with_controller("b");
    a_ctl.set_status(MISTY, "available").await;
    b_ctl.set_status(MISTY, "not_available").await;

    let vigil = Vigil::builder()
        .with_connector(a)
        .with_connector(b)
        .build()
        .unwrap();

    let got = vigil.availability(&misty()).await.unwrap();
    assert_eq!(got, Availability::new("available"));
    assert!(b_ctl.availability_requests().await.is_empty());
}

#[tokio::test]
async fn preferred_connector_is_tried_first() {
    let (a, a_ctl) = DynamicMockConnector::new_with_controller("a");
    let (b, b_ctl) = DynamicMockConnector::new_with_controller("b");
    a_ctl.set_status(MISTY, "available").await;
    b_ctl.set_status(MISTY, "not_available").await;

    let vigil = Vigil::builder()
        .with_connector(a.clone())
        .with_connector(b.clone())
        .prefer(&[b, a])
        .build()
        .unwrap();

    let got = vigil.availability(&misty()).await.unwrap();
    assert_eq!(got.status, "not_available");
    assert!(a_ctl.availability_requests().await.is_empty());
}

#[tokio::test]
async fn failure_falls_through_to_next_connector() {
    let (a, a_ctl) = DynamicMockConnector::new_with_controller("a");
    let (b, b_ctl) = DynamicMockConnector::new_with_controller("b");
    a_ctl
        .set_availability_behavior(
            MISTY,
            MockBehavior::Fail(VigilError::connector("a", "boom")),
        )
        .await;
    b_ctl.set_status(MISTY, "available").await;

    let vigil = Vigil::builder()
        .with_connector(a)
        .with_connector(b)
        .build()
        .unwrap();

    let got = vigil.availability(&misty()).await.unwrap();
    assert_eq!(got.status, "available");
    assert_eq!(a_ctl.availability_requests().await.len(), 1);
    assert_eq!(b_ctl.availability_requests().await.len(), 1);
}

#[tokio::test]
async fn all_not_found_collapses_to_not_found() {
    let (a, a_ctl) = DynamicMockConnector::new_with_controller("a");
    let (b, b_ctl) = DynamicMockConnector::new_with_controller("b");
    for ctl in [&a_ctl, &b_ctl] {
        ctl.set_availability_behavior(MISTY, MockBehavior::Fail(VigilError::not_found("agent")))
            .await;
    }

    let vigil = Vigil::builder()
        .with_connector(a)
        .with_connector(b)
        .build()
        .unwrap();

    let err = vigil.availability(&misty()).await.unwrap_err();
    assert_eq!(err, VigilError::not_found("availability for 1001"));
}

#[tokio::test]
async fn mixed_failures_are_attributed_to_connectors() {
    let (a, a_ctl) = DynamicMockConnector::new_with_controller("a");
    let (b, b_ctl) = DynamicMockConnector::new_with_controller("b");
    a_ctl
        .set_availability_behavior(MISTY, MockBehavior::Fail(VigilError::not_found("agent")))
        .await;
    b_ctl
        .set_availability_behavior(MISTY, MockBehavior::Fail(VigilError::Data("bad".into())))
        .await;

    let vigil = Vigil::builder()
        .with_connector(a)
        .with_connector(b)
        .build()
        .unwrap();

    match vigil.availability(&misty()).await.unwrap_err() {
        VigilError::AllProvidersFailed(errs) => {
            assert_eq!(errs.len(), 2);
            assert!(matches!(errs[0], VigilError::NotFound { .. }));
            assert!(matches!(
                &errs[1],
                VigilError::Connector { connector, .. } if connector == "b"
            ));
        }
        other => panic!("unexpected: {other:?}"),
    }
}
