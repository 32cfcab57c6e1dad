use chrono::TimeDelta;
use vigil::{AgentId, MemoryStore, VigilError};

use crate::helpers::{JORDAN, MISTY, jordan, ledger, misty, rec, rig_with_store};

#[tokio::test]
async fn totals_cover_every_configured_agent() {
    let store = MemoryStore::with_ledgers([(
        AgentId::from(MISTY),
        ledger(vec![
            rec("available", 9, 0),
            rec("not_available", 10, 0),
            rec("available", 11, 0),
            rec("not_available", 12, 0),
            rec("available", 13, 0),
        ]),
    )]);
    let r = rig_with_store(&[misty(), jordan()], store, |b| b);

    let report = r.vigil.totals().await;
    assert!(report.warnings.is_empty());
    assert_eq!(report.totals.len(), 2);

    let m = &report.totals[0];
    assert_eq!(m.agent, misty());
    // The 13:00 interval is still open and does not count.
    assert_eq!(m.available(), TimeDelta::hours(2));
    assert_eq!(m.records, 5);

    let j = &report.totals[1];
    assert_eq!(j.agent.id, AgentId::from(JORDAN));
    assert_eq!(j.available(), TimeDelta::zero());
    assert_eq!(j.records, 0);

    // Totals never send or clear anything.
    assert!(r.sender.sent().await.is_empty());
    assert_eq!(r.stack(MISTY).await.len(), 5);
}

#[tokio::test]
async fn malformed_window_becomes_a_warning() {
    let store = MemoryStore::with_ledgers([
        (
            AgentId::from(MISTY),
            ledger(vec![
                rec("available", 9, 0),
                rec("not_available", 10, 0),
                rec("available", 8, 0),
            ]),
        ),
        (
            AgentId::from(JORDAN),
            ledger(vec![rec("available", 9, 0), rec("not_available", 9, 45)]),
        ),
    ]);
    let r = rig_with_store(&[misty(), jordan()], store, |b| b);

    let report = r.vigil.totals().await;
    assert_eq!(
        report.warnings,
        vec![VigilError::InvalidSequenceOrder { index: 2 }]
    );
    assert_eq!(report.totals.len(), 1);
    assert_eq!(report.totals[0].agent, jordan());
    assert_eq!(report.totals[0].available(), TimeDelta::minutes(45));
}
