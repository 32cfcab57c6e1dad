use vigil::{AgentId, MemoryStore, VigilError};

use crate::helpers::{JORDAN, MISTY, jordan, ledger, misty, rec, rig_with_store};

fn seeded() -> MemoryStore {
    MemoryStore::with_ledgers([(
        AgentId::from(MISTY),
        ledger(vec![
            rec("available", 9, 0),
            rec("not_available", 10, 30),
            rec("available", 11, 0),
        ]),
    )])
}

#[tokio::test]
async fn dispatch_sends_non_empty_windows_and_clears_them() {
    let r = rig_with_store(&[misty(), jordan()], seeded(), |b| b);

    let report = r.vigil.dispatch().await.unwrap();
    assert_eq!(report.sent, vec![AgentId::from(MISTY)]);
    assert!(report.warnings.is_empty());

    let sent = r.sender.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "ZD Misty Kennedy TALK STATUS REPORT");
    let lines: Vec<&str> = sent[0].text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("AVAILABLE 2024-03-04 11:00:00"));
    assert!(lines[2].ends_with("AVAILABLE 2024-03-04 09:00:00"));
    assert_eq!(lines[3], "Total available: 1:30:00");

    assert!(r.stack(MISTY).await.is_empty());
    assert!(r.stack(JORDAN).await.is_empty());
}

#[tokio::test]
async fn failed_delivery_keeps_the_window() {
    let r = rig_with_store(&[misty()], seeded(), |b| b);
    r.sender.fail_with(Some("rejected")).await;

    let report = r.vigil.dispatch().await.unwrap();
    assert!(report.sent.is_empty());
    assert_eq!(
        report.warnings,
        vec![VigilError::delivery("vigil-recording", "rejected")]
    );
    assert_eq!(r.stack(MISTY).await.len(), 3);
}

#[tokio::test]
async fn report_for_renders_without_sending() {
    let r = rig_with_store(&[misty()], seeded(), |b| b);

    let msg = r.vigil.report_for(&misty()).await.unwrap();
    assert!(msg.text.ends_with("Total available: 1:30:00"));
    let html = msg.html.unwrap();
    assert!(html.contains("<th>DATETIME</th>"));
    assert!(html.contains("<p>Total available: 1:30:00</p>"));
    assert!(r.sender.sent().await.is_empty());
    assert_eq!(r.stack(MISTY).await.len(), 3);
}

#[tokio::test]
async fn out_of_order_window_is_not_dispatched() {
    let store = MemoryStore::with_ledgers([(
        AgentId::from(MISTY),
        ledger(vec![rec("available", 10, 0), rec("not_available", 9, 0)]),
    )]);
    let r = rig_with_store(&[misty()], store, |b| b);

    let report = r.vigil.dispatch().await.unwrap();
    assert!(report.sent.is_empty());
    assert_eq!(
        report.warnings,
        vec![VigilError::InvalidSequenceOrder { index: 1 }]
    );
    assert_eq!(r.stack(MISTY).await.len(), 2);
}
