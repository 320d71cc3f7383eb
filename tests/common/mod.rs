mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from groupos for tests
pub use groupos::{
    Deal, DealField, DealFilter, DealMetric, DealRepository, Entity, Identity, NewDeal,
    PipelineSummary, Probability, Promotion, Prospect, ProspectFilter, ProspectMetric,
    ProspectRepository, ProspectStatus, Region, Role, Sector, Session, SessionConfig, SessionDb,
    SessionError, SessionRegistry, Stage, StoreError, TableName, View, Zar,
};
