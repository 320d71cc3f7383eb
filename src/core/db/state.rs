use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::{
    db::{
        deal::{Deal, Entity, Stage},
        model::{Probability, Zar},
        prospect::{Prospect, ProspectStatus, Region, Sector},
        table::Table,
    },
    error::StoreError,
};

#[derive(Debug, Default)]
pub(super) struct Tables {
    pub(super) deals: Table<Deal>,
    pub(super) prospects: Table<Prospect>,
}

/// Both tables behind one lock, so cross-table operations are atomic.
pub(super) struct SessionState {
    tables: RwLock<Tables>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("SessionState")
            .field("deals", &tables.deals.len())
            .field("prospects", &tables.prospects.len())
            .finish()
    }
}

impl SessionState {
    pub(super) fn new(deals: Table<Deal>, prospects: Table<Prospect>) -> Self {
        Self {
            tables: RwLock::new(Tables { deals, prospects }),
        }
    }

    pub(super) fn seeded() -> Result<Self, StoreError> {
        Ok(Self::new(
            Table::from_rows(seed_deals()?)?,
            Table::from_rows(seed_prospects())?,
        ))
    }

    pub(super) fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read()
    }

    pub(super) fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write()
    }
}

fn seed_deals() -> Result<Vec<Deal>, StoreError> {
    let rows = [
        ("Sturrock & Robson Pilot", Entity::Vas, Stage::Proposal, 35_000, 0.9, "Audit Engagement"),
        ("JCI Sandton Expansion", Entity::Faft, Stage::Lead, 1_500_000, 0.4, "Sister Presentation"),
        ("Bonnyvale Off-Take", Entity::Bonnyvale, Stage::Negotiation, 450_000, 0.7, "Contract Review"),
        ("EnergyShield Seed Round", Entity::EnergyShield, Stage::DueDiligence, 5_000_000, 0.5, "Data Room Prep"),
        ("Pineapple Export Logistics", Entity::Bonnyvale, Stage::Active, 120_000, 1.0, "Route Opt."),
    ];
    rows.into_iter()
        .map(|(name, entity, stage, value, probability, next_action)| {
            Ok(Deal {
                name: name.to_string(),
                entity,
                stage,
                value: Zar::new(value),
                probability: Probability::new(probability)?,
                next_action: next_action.to_string(),
            })
        })
        .collect()
}

fn seed_prospects() -> Vec<Prospect> {
    let rows = [
        ("Orion Mining", Sector::Mining, 85_000_000, Region::NorthWest, ProspectStatus::Cold),
        ("Titan Logistics", Sector::Logistics, 12_000_000, Region::Gauteng, ProspectStatus::Target),
        ("Apex Retail", Sector::Retail, 55_000_000, Region::Kzn, ProspectStatus::Target),
        ("Delta Energy", Sector::Energy, 120_000_000, Region::Mpumalanga, ProspectStatus::Cold),
        ("Echo Farms", Sector::Agriculture, 8_000_000, Region::EasternCape, ProspectStatus::Warm),
    ];
    rows.into_iter()
        .map(|(company, sector, turnover, region, status)| Prospect {
            company: company.to_string(),
            sector,
            turnover: Zar::new(turnover),
            region,
            status,
        })
        .collect()
}
