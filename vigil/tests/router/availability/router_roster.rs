use std::sync::Arc;

use vigil::{Agent, Vigil, VigilError};
use vigil_mock::{DynamicMockConnector, MockBehavior, MockConnector};

#[tokio::test]
async fn roster_lists_fixture_agents() {
    let vigil = Vigil::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();

    let agents = vigil.roster().await.unwrap();
    let names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Misty Kennedy", "Jordan Blake", "Sam Ortiz"]);
    assert_eq!(agents, MockConnector::fixture_agents());
}

#[tokio::test]
async fn roster_falls_back_after_a_failing_connector() {
    let (a, a_ctl) = DynamicMockConnector::new_with_controller("a");
    a_ctl
        .set_roster_behavior(MockBehavior::Fail(VigilError::connector("a", "down")))
        .await;
    let (b, b_ctl) = DynamicMockConnector::new_with_controller("b");
    b_ctl
        .set_roster_behavior(MockBehavior::Return(vec![Agent::new("7", "Seven")]))
        .await;

    let vigil = Vigil::builder()
        .with_connector(a)
        .with_connector(b)
        .build()
        .unwrap();

    assert_eq!(vigil.roster().await.unwrap(), vec![Agent::new("7", "Seven")]);
}
