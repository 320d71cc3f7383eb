use groupos::{Entity, Identity, NewDeal, Probability, Session, SessionDb, Stage, Zar};

/// Sum of the seeded deal values.
pub const SEED_PIPELINE_TOTAL: u64 = 35_000 + 1_500_000 + 450_000 + 5_000_000 + 120_000;

pub const SEED_DEAL_NAMES: [&str; 5] = [
    "Sturrock & Robson Pilot",
    "JCI Sandton Expansion",
    "Bonnyvale Off-Take",
    "EnergyShield Seed Round",
    "Pineapple Export Logistics",
];

/// Creates a store loaded with the seed deals and prospects.
pub fn create_seeded_db() -> SessionDb {
    SessionDb::seeded().expect("Seed data should load")
}

/// Creates a session already signed in as the admin identity.
pub fn create_admin_session() -> Session {
    let mut session = Session::default();
    session
        .select_identity(Identity::AdminVas)
        .expect("Admin sign-in should seed the store");
    session
}

/// Creates a session signed in as the client identity.
pub fn create_client_session() -> Session {
    let mut session = Session::default();
    session
        .select_identity(Identity::ClientSr)
        .expect("Client sign-in should succeed");
    session
}

/// Creates a NewDeal in the Lead stage with test data
pub fn make_new_deal(name: &str, entity: Entity, value: u64) -> NewDeal {
    NewDeal {
        name: name.to_string(),
        entity,
        value: Zar::new(value),
        stage: Stage::Lead,
    }
}

pub fn probability(value: f64) -> Probability {
    Probability::new(value).expect("test probability should be within [0, 1]")
}
