use vigil::{ReportConfig, ReportMode};

use crate::helpers::{MISTY, misty, rig};

#[tokio::test]
async fn change_mode_sends_a_one_line_notification() {
    let r = rig(&[misty()], |b| b.report_mode(ReportMode::Change));
    r.ctl.set_status(MISTY, "available").await;
    r.vigil.poll().await.unwrap();

    let sent = r.sender.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(
        sent[0]
            .subject
            .starts_with("Misty Kennedy status changed to: available at ")
    );
    assert_eq!(sent[0].subject, sent[0].text);
    assert!(sent[0].html.is_none());
}

#[tokio::test]
async fn report_config_shapes_the_ledger_subject() {
    let r = rig(&[misty()], |b| {
        b.report(ReportConfig {
            subject_prefix: "HD".into(),
            service: "CHAT".into(),
            display_offset_minutes: 120,
        })
    });
    r.ctl.set_status(MISTY, "available").await;
    r.vigil.poll().await.unwrap();

    let sent = r.sender.sent().await;
    assert_eq!(sent[0].subject, "HD Misty Kennedy CHAT STATUS REPORT");
    assert!(sent[0].text.contains("Misty Kennedy CHAT AVAILABLE"));
}
