use std::sync::Arc;

use vigil::{EventStore, MemoryStore, Vigil, VigilError};
use vigil_mock::{DynamicMockConnector, MockBehavior};

use crate::helpers::{JORDAN, MISTY, jordan, misty, rig};

#[tokio::test]
async fn one_failing_agent_does_not_abort_the_pass() {
    let r = rig(&[misty(), jordan()], |b| b);
    r.ctl
        .set_availability_behavior(
            MISTY,
            MockBehavior::Fail(VigilError::connector("dyn", "upstream 500")),
        )
        .await;
    r.ctl.set_status(JORDAN, "not_available").await;

    let report = r.vigil.poll().await.unwrap();
    assert_eq!(report.changes.len(), 1);
    assert_eq!(report.changes[0].agent, jordan());
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(report.warnings[0], VigilError::AllProvidersFailed(_)));
    assert!(r.stack(MISTY).await.is_empty());
    assert_eq!(r.stack(JORDAN).await.len(), 1);
}

#[tokio::test]
async fn every_agent_is_polled_once() {
    let r = rig(&[misty(), jordan()], |b| b);
    r.ctl.set_status(MISTY, "available").await;
    r.ctl.set_status(JORDAN, "available").await;

    r.vigil.poll().await.unwrap();
    let mut asked: Vec<String> = r
        .ctl
        .availability_requests()
        .await
        .iter()
        .map(ToString::to_string)
        .collect();
    asked.sort();
    assert_eq!(asked, vec![MISTY.to_string(), JORDAN.to_string()]);
}

#[tokio::test]
async fn missing_sender_records_change_with_warning() {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.set_status(MISTY, "available").await;
    let store = Arc::new(MemoryStore::new());
    let vigil = Vigil::builder()
        .with_connector(conn)
        .store(store.clone())
        .agent(misty())
        .build()
        .unwrap();

    let report = vigil.poll().await.unwrap();
    assert_eq!(report.changes.len(), 1);
    assert!(!report.changes[0].reported);
    assert_eq!(report.warnings, vec![VigilError::unsupported("report")]);
    assert_eq!(store.ledger(&misty().id).await.unwrap().stack.len(), 1);
}

#[tokio::test]
async fn delivery_failure_keeps_the_record() {
    let r = rig(&[misty()], |b| b);
    r.sender.fail_with(Some("smtp down")).await;
    r.ctl.set_status(MISTY, "available").await;

    let report = r.vigil.poll().await.unwrap();
    assert_eq!(report.changes.len(), 1);
    assert!(!report.changes[0].reported);
    assert_eq!(
        report.warnings,
        vec![VigilError::delivery("vigil-recording", "smtp down")]
    );
    assert_eq!(r.stack(MISTY).await.len(), 1);

    // A later change is still reported once delivery recovers.
    r.sender.fail_with(None).await;
    r.ctl.set_status(MISTY, "not_available").await;
    let report = r.vigil.poll().await.unwrap();
    assert!(report.changes[0].reported);
    assert_eq!(r.sender.sent().await.len(), 1);
}
