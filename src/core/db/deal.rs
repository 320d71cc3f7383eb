use serde::Serialize;

use crate::core::{
    db::{
        model::{Probability, Zar, labelled_enum},
        table::{Record, RowFilter, at_least, member_of},
    },
    error::{StoreError, TableName},
};

labelled_enum! {
    /// Group company a deal is booked under.
    pub enum Entity as "entity" {
        Vas => "VAS",
        Faft => "FAFT",
        Bonnyvale => "Bonnyvale",
        EnergyShield => "EnergyShield",
    }
}

labelled_enum! {
    pub enum Stage as "stage" {
        Lead => "Lead",
        Meeting => "Meeting",
        Proposal => "Proposal",
        Negotiation => "Negotiation",
        DueDiligence => "Due Diligence",
        Closed => "Closed",
        Active => "Active",
    }
}

impl Stage {
    /// Stages a manually entered deal may start in.
    pub const OPENING: &'static [Stage] = &[Stage::Lead, Stage::Meeting, Stage::Proposal];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deal {
    pub name: String,
    pub entity: Entity,
    pub stage: Stage,
    pub value: Zar,
    pub probability: Probability,
    pub next_action: String,
}

impl Deal {
    pub fn weighted_value(&self) -> f64 {
        self.value.as_f64() * self.probability.value()
    }
}

/// Manual pipeline entry. Probability and next action take their defaults.
#[derive(Debug, Clone)]
pub struct NewDeal {
    pub name: String,
    pub entity: Entity,
    pub value: Zar,
    pub stage: Stage,
}

impl NewDeal {
    pub const NEXT_ACTION: &'static str = "Initial Contact";

    pub(super) fn into_deal(self) -> Result<Deal, StoreError> {
        if !Stage::OPENING.contains(&self.stage) {
            return Err(StoreError::invalid(
                "stage",
                format!("new deals start at Lead, Meeting or Proposal, not {}", self.stage),
            ));
        }
        Ok(Deal {
            name: self.name.trim().to_string(),
            entity: self.entity,
            stage: self.stage,
            value: self.value,
            probability: Probability::INITIAL,
            next_action: Self::NEXT_ACTION.to_string(),
        })
    }
}

/// A single-field overwrite. The name is the key and cannot be edited.
#[derive(Debug, Clone, PartialEq)]
pub enum DealField {
    Entity(Entity),
    Stage(Stage),
    Value(Zar),
    Probability(Probability),
    NextAction(String),
}

impl DealField {
    pub(super) fn apply(self, deal: &mut Deal) {
        match self {
            DealField::Entity(entity) => deal.entity = entity,
            DealField::Stage(stage) => deal.stage = stage,
            DealField::Value(value) => deal.value = value,
            DealField::Probability(probability) => deal.probability = probability,
            DealField::NextAction(action) => deal.next_action = action,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealMetric {
    Value,
    Probability,
}

#[derive(Debug, Clone, Default)]
pub struct DealFilter {
    pub entities: Option<Vec<Entity>>,
    pub stages: Option<Vec<Stage>>,
    pub min_value: Option<Zar>,
    pub min_probability: Option<Probability>,
}

impl RowFilter<Deal> for DealFilter {
    fn matches(&self, row: &Deal) -> bool {
        member_of(self.entities.as_deref(), &row.entity)
            && member_of(self.stages.as_deref(), &row.stage)
            && at_least(self.min_value, row.value)
            && at_least(self.min_probability, row.probability)
    }
}

impl Record for Deal {
    const TABLE: TableName = TableName::Deals;
    type Metric = DealMetric;

    fn key(&self) -> &str {
        &self.name
    }

    fn metric(&self, metric: DealMetric) -> f64 {
        match metric {
            DealMetric::Value => self.value.as_f64(),
            DealMetric::Probability => self.probability.value(),
        }
    }

    /// The pipeline total must stay representable.
    fn admit<'a>(&self, others: impl Iterator<Item = &'a Deal>) -> Result<(), StoreError> {
        others
            .map(|deal| deal.value)
            .try_fold(self.value, Zar::checked_add)
            .map(|_| ())
            .ok_or_else(|| {
                StoreError::invalid(
                    "value",
                    format!("{} would overflow the pipeline total", self.value),
                )
            })
    }
}

/// Pipeline headline figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub deal_count: usize,
    pub total_value: Zar,
    pub weighted_forecast: f64,
}

pub trait DealRepository {
    fn get_deals(&self) -> Vec<Deal>;
    fn get_deal(&self, name: &str) -> Option<Deal>;
    fn list_deals(&self, filter: &DealFilter) -> Vec<Deal>;
    fn update_deal(&self, name: &str, field: DealField) -> Result<Deal, StoreError>;
    /// Stage and probability change together or not at all.
    fn edit_deal(&self, name: &str, stage: Stage, probability: Probability) -> Result<Deal, StoreError>;
    fn append_deal(&self, deal: Deal) -> Result<Deal, StoreError>;
    fn add_deal(&self, deal: NewDeal) -> Result<Deal, StoreError>;
    fn aggregate_deals(&self, metric: DealMetric, weight: Option<DealMetric>) -> f64;
    fn pipeline_summary(&self) -> PipelineSummary;
}
