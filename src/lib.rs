pub mod core;
pub mod ops;
pub mod session;

pub use crate::core::db::{
    Deal, DealField, DealFilter, DealMetric, DealRepository, Entity, NewDeal, PipelineSummary,
    Probability, Promotion, Prospect, ProspectFilter, ProspectMetric, ProspectRepository,
    ProspectStatus, Region, Sector, SessionDb, Stage, Zar,
};
pub use crate::core::{SessionError, StoreError, TableName};
pub use session::{CommandSummary, Identity, Role, Session, SessionConfig, SessionRegistry, View};
