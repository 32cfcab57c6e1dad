use vigil_core::{Agent, Availability};

const AGENTS: &[(&str, &str, &str, &str)] = &[
    ("1001", "Misty Kennedy", "available", "phone"),
    ("1002", "Jordan Blake", "not_available", "phone"),
    ("1003", "Sam Ortiz", "away", "web"),
];

pub fn roster() -> Vec<Agent> {
    AGENTS
        .iter()
        .map(|(id, name, _, _)| Agent::new(*id, *name))
        .collect()
}

pub fn availability_by_id(id: &str) -> Option<Availability> {
    AGENTS
        .iter()
        .find(|(agent, ..)| *agent == id)
        .map(|(_, _, status, via)| Availability {
            status: (*status).to_string(),
            via: Some((*via).to_string()),
        })
}
