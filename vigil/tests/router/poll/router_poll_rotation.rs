use crate::helpers::{MISTY, misty, rig};

async fn flip(r: &crate::helpers::Rig, times: usize) {
    for i in 0..times {
        let status = if i % 2 == 0 { "available" } else { "not_available" };
        r.ctl.set_status(MISTY, status).await;
        r.vigil.poll().await.unwrap();
    }
}

#[tokio::test]
async fn full_window_is_archived_with_keep_history() {
    let r = rig(&[misty()], |b| b.stack_size(2).keep_history(true));
    flip(&r, 2).await;

    let ledger = r.ledger(MISTY).await;
    assert!(ledger.stack.is_empty());
    assert_eq!(ledger.history.len(), 2);
    assert_eq!(ledger.history[0].status, "available");
    assert_eq!(ledger.history[1].status, "not_available");
}

#[tokio::test]
async fn full_window_is_dropped_without_history() {
    let r = rig(&[misty()], |b| b.stack_size(2));
    flip(&r, 3).await;

    let ledger = r.ledger(MISTY).await;
    assert!(ledger.history.is_empty());
    assert_eq!(ledger.stack.len(), 1);
    assert_eq!(ledger.stack[0].status, "available");
}

#[tokio::test]
async fn report_is_sent_before_rotation() {
    let r = rig(&[misty()], |b| b.stack_size(2));
    flip(&r, 2).await;

    // The report for the closing record still covers the whole window.
    let sent = r.sender.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].text.lines().count(), 3);
}

#[tokio::test]
async fn reading_after_rotation_starts_a_new_window() {
    let r = rig(&[misty()], |b| b.stack_size(2).keep_history(true));
    flip(&r, 2).await;

    // Same status as the last archived record: the new window has no
    // predecessor, so it is recorded.
    r.ctl.set_status(MISTY, "not_available").await;
    let report = r.vigil.poll().await.unwrap();
    assert_eq!(report.changes.len(), 1);
    assert_eq!(report.changes[0].previous, None);
    assert_eq!(r.ledger(MISTY).await.history.len(), 2);
}
