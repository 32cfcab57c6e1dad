use std::sync::Arc;
use std::time::Duration;

use vigil::{Agent, ReportMode, Vigil, VigilError};
use vigil_mock::MockConnector;

use crate::helpers::misty;

#[test]
fn build_requires_a_connector() {
    let err = Vigil::builder().agent(misty()).build().err().unwrap();
    assert!(matches!(err, VigilError::InvalidArg(_)));
}

#[test]
fn zero_stack_size_is_rejected() {
    let err = Vigil::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .stack_size(0)
        .build()
        .err()
        .unwrap();
    match err {
        VigilError::InvalidArg(msg) => assert!(msg.contains("stack_size")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn duplicate_agent_ids_are_rejected() {
    let err = Vigil::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .agent(misty())
        .agent(Agent::new("1001", "Someone Else"))
        .build()
        .err()
        .unwrap();
    match err {
        VigilError::InvalidArg(msg) => assert!(msg.contains("1001")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn defaults_and_overrides_are_visible() {
    let vigil = Vigil::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .agent(misty())
        .build()
        .unwrap();
    let cfg = vigil.config();
    assert_eq!(cfg.stack_size, 12);
    assert!(!cfg.keep_history);
    assert!(!cfg.always_report);
    assert_eq!(cfg.report_mode, ReportMode::Ledger);
    assert_eq!(cfg.provider_timeout, Duration::from_secs(5));
    assert_eq!(cfg.request_timeout, None);
    assert_eq!(vigil.agents(), &[misty()]);

    let tuned = Vigil::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .stack_size(3)
        .keep_history(true)
        .report_mode(ReportMode::Change)
        .request_timeout(Duration::from_secs(9))
        .build()
        .unwrap();
    assert_eq!(tuned.config().stack_size, 3);
    assert!(tuned.config().keep_history);
    assert_eq!(tuned.config().report_mode, ReportMode::Change);
    assert_eq!(
        tuned.config().request_timeout,
        Some(Duration::from_secs(9))
    );
}
