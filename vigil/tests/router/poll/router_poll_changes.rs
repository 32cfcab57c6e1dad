use vigil::Status;

use crate::helpers::{MISTY, misty, rig};

#[tokio::test]
async fn first_reading_is_recorded_and_reported() {
    let r = rig(&[misty()], |b| b);
    r.ctl.set_status(MISTY, "available").await;

    let report = r.vigil.poll().await.unwrap();
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.changes.len(), 1);
    let change = &report.changes[0];
    assert_eq!(change.agent, misty());
    assert_eq!(change.previous, None);
    assert_eq!(change.current, Status::Available);
    assert!(change.reported);

    let stack = r.stack(MISTY).await;
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].status, "available");
    assert_eq!(stack[0].at, change.at);

    let sent = r.sender.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "ZD Misty Kennedy TALK STATUS REPORT");
    assert!(sent[0].text.contains("Id: 1001, Name: Misty Kennedy TALK AVAILABLE"));
    assert!(sent[0].text.ends_with("Total available: 0:00:00"));
    assert!(sent[0].html.is_some());
}

#[tokio::test]
async fn unchanged_status_is_not_recorded_again() {
    let r = rig(&[misty()], |b| b);
    r.ctl.set_status(MISTY, "available").await;
    r.vigil.poll().await.unwrap();

    // Same status with different casing and separator.
    r.ctl.set_status(MISTY, "AVAILABLE").await;
    let report = r.vigil.poll().await.unwrap();
    assert!(report.changes.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(r.stack(MISTY).await.len(), 1);
    assert_eq!(r.sender.sent().await.len(), 1);
}

#[tokio::test]
async fn transition_carries_previous_status() {
    let r = rig(&[misty()], |b| b);
    r.ctl.set_status(MISTY, "available").await;
    r.vigil.poll().await.unwrap();
    r.ctl.set_status(MISTY, "Not Available").await;

    let report = r.vigil.poll().await.unwrap();
    assert_eq!(report.changes.len(), 1);
    assert_eq!(report.changes[0].previous, Some(Status::Available));
    assert_eq!(report.changes[0].current, Status::NotAvailable);

    let stack = r.stack(MISTY).await;
    let raw: Vec<&str> = stack.iter().map(|s| s.status.as_str()).collect();
    assert_eq!(raw, vec!["available", "Not Available"]);

    // The second report lists both records, newest first.
    let sent = r.sender.take().await;
    let last = sent.last().unwrap();
    let first_line = last.text.lines().next().unwrap();
    assert!(first_line.contains("NOT AVAILABLE"), "{first_line}");
}

#[tokio::test]
async fn statuses_outside_markers_are_skipped() {
    let r = rig(&[misty()], |b| b);
    r.ctl.set_status(MISTY, "away").await;

    let report = r.vigil.poll().await.unwrap();
    assert!(report.changes.is_empty());
    assert!(report.warnings.is_empty());
    assert!(r.stack(MISTY).await.is_empty());
    assert!(r.sender.sent().await.is_empty());
}

#[tokio::test]
async fn always_report_records_every_reading() {
    let r = rig(&[misty()], |b| b.always_report(true));
    r.ctl.set_status(MISTY, "available").await;
    for _ in 0..3 {
        r.vigil.poll().await.unwrap();
    }
    assert_eq!(r.stack(MISTY).await.len(), 3);
    assert_eq!(r.sender.sent().await.len(), 3);
}

#[tokio::test]
async fn custom_markers_drive_classification() {
    let r = rig(&[misty()], |b| {
        b.markers(vigil::StatusMarkers::new("online", "offline"))
    });
    r.ctl.set_status(MISTY, "available").await;
    assert!(r.vigil.poll().await.unwrap().changes.is_empty());

    r.ctl.set_status(MISTY, "ONLINE").await;
    let report = r.vigil.poll().await.unwrap();
    assert_eq!(report.changes[0].current, Status::Available);
}
