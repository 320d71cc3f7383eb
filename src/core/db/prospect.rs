use serde::Serialize;

use crate::core::{
    db::{
        deal::{Deal, Entity, Stage},
        model::{Probability, Zar, labelled_enum},
        table::{Record, RowFilter, at_least, member_of},
    },
    error::{StoreError, TableName},
};

labelled_enum! {
    pub enum Sector as "sector" {
        Mining => "Mining",
        Logistics => "Logistics",
        Retail => "Retail",
        Energy => "Energy",
        Agriculture => "Agriculture",
    }
}

labelled_enum! {
    pub enum Region as "region" {
        NorthWest => "North West",
        Gauteng => "Gauteng",
        Kzn => "KZN",
        Mpumalanga => "Mpumalanga",
        EasternCape => "Eastern Cape",
    }
}

labelled_enum! {
    pub enum ProspectStatus as "status" {
        Cold => "Cold",
        Warm => "Warm",
        Target => "Target",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prospect {
    pub company: String,
    pub sector: Sector,
    pub turnover: Zar,
    pub region: Region,
    pub status: ProspectStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProspectMetric {
    Turnover,
}

#[derive(Debug, Clone, Default)]
pub struct ProspectFilter {
    pub sectors: Option<Vec<Sector>>,
    pub regions: Option<Vec<Region>>,
    pub statuses: Option<Vec<ProspectStatus>>,
    pub min_turnover: Option<Zar>,
}

impl RowFilter<Prospect> for ProspectFilter {
    fn matches(&self, row: &Prospect) -> bool {
        member_of(self.sectors.as_deref(), &row.sector)
            && member_of(self.regions.as_deref(), &row.region)
            && member_of(self.statuses.as_deref(), &row.status)
            && at_least(self.min_turnover, row.turnover)
    }
}

impl Record for Prospect {
    const TABLE: TableName = TableName::Prospects;
    type Metric = ProspectMetric;

    fn key(&self) -> &str {
        &self.company
    }

    fn metric(&self, metric: ProspectMetric) -> f64 {
        match metric {
            ProspectMetric::Turnover => self.turnover.as_f64(),
        }
    }
}

/// Terms for turning a prospect into a pipeline deal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Promotion {
    pub entity: Entity,
    pub valuation_ratio: f64,
}

impl Promotion {
    pub const DEFAULT_VALUATION_RATIO: f64 = 0.05;
    pub const NAME_SUFFIX: &'static str = " - Initial Scope";
    pub const NEXT_ACTION: &'static str = "Outreach";

    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            valuation_ratio: Self::DEFAULT_VALUATION_RATIO,
        }
    }

    pub fn with_valuation_ratio(mut self, ratio: f64) -> Self {
        self.valuation_ratio = ratio;
        self
    }

    pub(super) fn derive_deal(&self, prospect: &Prospect) -> Result<Deal, StoreError> {
        Ok(Deal {
            name: format!("{}{}", prospect.company, Self::NAME_SUFFIX),
            entity: self.entity,
            stage: Stage::Lead,
            value: prospect.turnover.scaled(self.valuation_ratio)?,
            probability: Probability::INITIAL,
            next_action: Self::NEXT_ACTION.to_string(),
        })
    }
}

pub trait ProspectRepository {
    fn get_prospects(&self) -> Vec<Prospect>;
    fn get_prospect(&self, company: &str) -> Option<Prospect>;
    fn list_prospects(&self, filter: &ProspectFilter) -> Vec<Prospect>;
    fn aggregate_prospects(&self, metric: ProspectMetric, weight: Option<ProspectMetric>) -> f64;
    /// Append a deal derived from `company`. The prospect itself is untouched.
    fn promote_prospect(&self, company: &str, promotion: &Promotion) -> Result<Deal, StoreError>;
}
