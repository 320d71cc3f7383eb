mod deal;
mod model;
mod prospect;
mod state;
mod table;

use std::sync::Arc;

use state::SessionState;
use tracing::{debug, info};

pub use deal::{
    Deal, DealField, DealFilter, DealMetric, DealRepository, Entity, NewDeal, PipelineSummary,
    Stage,
};
pub use model::{Probability, Zar};
pub use prospect::{
    Promotion, Prospect, ProspectFilter, ProspectMetric, ProspectRepository, ProspectStatus,
    Region, Sector,
};
pub use table::{Record, RowFilter, Table};

use crate::core::error::StoreError;

/// The deals and prospects tables of one session.
///
/// Cloning shares the same tables; nothing is shared between sessions
/// unless a handle is cloned across them.
#[derive(Debug, Clone)]
pub struct SessionDb {
    state: Arc<SessionState>,
}

impl SessionDb {
    /// A store loaded with the fixed pipeline and prospect seed data.
    pub fn seeded() -> Result<Self, StoreError> {
        let state = SessionState::seeded()?;
        info!(?state, "initialized session store from seed data");
        Ok(Self {
            state: Arc::new(state),
        })
    }

    pub fn deal_count(&self) -> usize {
        self.state.read().deals.len()
    }

    pub fn prospect_count(&self) -> usize {
        self.state.read().prospects.len()
    }
}

impl DealRepository for SessionDb {
    fn get_deals(&self) -> Vec<Deal> {
        self.state.read().deals.rows().to_vec()
    }

    fn get_deal(&self, name: &str) -> Option<Deal> {
        self.state.read().deals.get(name).cloned()
    }

    fn list_deals(&self, filter: &DealFilter) -> Vec<Deal> {
        self.state.read().deals.list(filter)
    }

    fn update_deal(&self, name: &str, field: DealField) -> Result<Deal, StoreError> {
        debug!(deal = name, ?field, "updating deal field");
        self.state.write().deals.update(name, |deal| field.apply(deal))
    }

    fn edit_deal(
        &self,
        name: &str,
        stage: Stage,
        probability: Probability,
    ) -> Result<Deal, StoreError> {
        let updated = self.state.write().deals.update(name, |deal| {
            DealField::Stage(stage).apply(deal);
            DealField::Probability(probability).apply(deal);
        })?;
        info!(deal = name, %stage, %probability, "updated deal record");
        Ok(updated)
    }

    fn append_deal(&self, deal: Deal) -> Result<Deal, StoreError> {
        let appended = self.state.write().deals.append(deal)?;
        info!(deal = %appended.name, value = %appended.value, "appended deal");
        Ok(appended)
    }

    fn add_deal(&self, deal: NewDeal) -> Result<Deal, StoreError> {
        self.append_deal(deal.into_deal()?)
    }

    fn aggregate_deals(&self, metric: DealMetric, weight: Option<DealMetric>) -> f64 {
        self.state.read().deals.aggregate(metric, weight)
    }

    fn pipeline_summary(&self) -> PipelineSummary {
        let tables = self.state.read();
        PipelineSummary {
            deal_count: tables.deals.len(),
            total_value: tables.deals.rows().iter().map(|deal| deal.value).sum(),
            weighted_forecast: tables
                .deals
                .aggregate(DealMetric::Value, Some(DealMetric::Probability)),
        }
    }
}

impl ProspectRepository for SessionDb {
    fn get_prospects(&self) -> Vec<Prospect> {
        self.state.read().prospects.rows().to_vec()
    }

    fn get_prospect(&self, company: &str) -> Option<Prospect> {
        self.state.read().prospects.get(company).cloned()
    }

    fn list_prospects(&self, filter: &ProspectFilter) -> Vec<Prospect> {
        self.state.read().prospects.list(filter)
    }

    fn aggregate_prospects(&self, metric: ProspectMetric, weight: Option<ProspectMetric>) -> f64 {
        self.state.read().prospects.aggregate(metric, weight)
    }

    fn promote_prospect(&self, company: &str, promotion: &Promotion) -> Result<Deal, StoreError> {
        let mut tables = self.state.write();
        let prospect = tables
            .prospects
            .get(company)
            .ok_or_else(|| StoreError::not_found(Prospect::TABLE, company))?;
        let deal = promotion.derive_deal(prospect)?;
        let deal = tables.deals.append(deal)?;
        info!(
            prospect = company,
            deal = %deal.name,
            value = %deal.value,
            entity = %deal.entity,
            "promoted prospect to pipeline"
        );
        Ok(deal)
    }
}
