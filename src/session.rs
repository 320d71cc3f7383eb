//! Per-session context: who is signed in, which views they may open, and the
//! session's private record store.
//!
//! Every handler takes the [`Session`] explicitly. Hosting several users means
//! one [`Session`] each, looked up through a [`SessionRegistry`].

use std::{collections::HashMap, fmt, sync::Arc};

use parking_lot::Mutex;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::{
    core::{
        SessionError,
        db::{
            Deal, DealFilter, DealRepository, Entity, NewDeal, PipelineSummary, Probability,
            Promotion, Prospect, ProspectFilter, ProspectRepository, SessionDb, Stage, Zar,
        },
    },
    ops::{self, Alert, FlowStatus, SafetyDocument, Site},
};

/// Simulated sign-in identities. There is no credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Identity {
    AdminVas,
    ClientSr,
}

impl Identity {
    pub fn label(self) -> &'static str {
        match self {
            Identity::AdminVas => "ADMIN_VAS (Balisa)",
            Identity::ClientSr => "CLIENT_SR (Sturrock Exec)",
        }
    }

    pub fn role(self) -> Role {
        match self {
            Identity::AdminVas => Role::Admin,
            Identity::ClientSr => Role::Client,
        }
    }

    /// Entity that deals promoted by this identity are booked under.
    pub fn home_entity(self) -> Entity {
        match self {
            Identity::AdminVas | Identity::ClientSr => Entity::Vas,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    pub fn views(self) -> &'static [View] {
        match self {
            Role::Admin => &[
                View::CentralCommand,
                View::DealStream,
                View::Hunter,
                View::GroupOverlay,
            ],
            Role::Client => &[
                View::GroupCockpit,
                View::LiquidAutomation,
                View::SturrockSafety,
            ],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Role::Admin => "STRATEGIST",
            Role::Client => "CLIENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("ADMIN"),
            Role::Client => f.write_str("CLIENT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum View {
    CentralCommand,
    DealStream,
    Hunter,
    /// The client cockpit as seen from the admin side.
    GroupOverlay,
    GroupCockpit,
    LiquidAutomation,
    SturrockSafety,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            View::CentralCommand => "Central Command",
            View::DealStream => "DealStream (CRM)",
            View::Hunter => "Hunter (Prospecting)",
            View::GroupOverlay => "S&R Overlay (Sim)",
            View::GroupCockpit => "Group Cockpit",
            View::LiquidAutomation => "Liquid Automation",
            View::SturrockSafety => "Sturrock Safety",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub valuation_ratio: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            valuation_ratio: Promotion::DEFAULT_VALUATION_RATIO,
        }
    }
}

/// Central Command headline figures.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSummary {
    pub total_system_value: Zar,
    pub deal_count: usize,
    pub sites: Vec<Site>,
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    started_at: OffsetDateTime,
    config: SessionConfig,
    identity: Option<Identity>,
    db: Option<SessionDb>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: OffsetDateTime::now_utc(),
            config,
            identity: None,
            db: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.map(Identity::role)
    }

    /// The record store, once an admin has signed in at least once.
    pub fn store(&self) -> Option<&SessionDb> {
        self.db.as_ref()
    }

    /// Sign in. An admin sign-in seeds the store the first time only; later
    /// sign-ins keep whatever edits were made.
    pub fn select_identity(&mut self, identity: Identity) -> Result<Role, SessionError> {
        let role = identity.role();
        if role == Role::Admin && self.db.is_none() {
            self.db = Some(SessionDb::seeded()?);
        }
        self.identity = Some(identity);
        info!(
            session = %self.id,
            started_at = %self.started_at,
            %identity,
            %role,
            "identity selected"
        );
        Ok(role)
    }

    /// Sign out. The tables stay with the session.
    pub fn logout(&mut self) {
        if let Some(identity) = self.identity.take() {
            info!(session = %self.id, %identity, "signed out");
        }
    }

    pub fn views(&self) -> &'static [View] {
        self.role().map(Role::views).unwrap_or(&[])
    }

    pub fn authorize(&self, view: View) -> Result<Role, SessionError> {
        self.authorize_any(&[view])
    }

    fn authorize_any(&self, views: &[View]) -> Result<Role, SessionError> {
        let role = self.role().ok_or(SessionError::NotAuthenticated)?;
        if views.iter().any(|view| role.views().contains(view)) {
            Ok(role)
        } else {
            Err(SessionError::AccessDenied {
                role,
                view: views[0],
            })
        }
    }

    fn store_for(&self, view: View) -> Result<&SessionDb, SessionError> {
        self.authorize(view)?;
        self.db.as_ref().ok_or(SessionError::NotAuthenticated)
    }

    pub fn deals(&self, filter: &DealFilter) -> Result<Vec<Deal>, SessionError> {
        Ok(self.store_for(View::DealStream)?.list_deals(filter))
    }

    pub fn pipeline(&self) -> Result<PipelineSummary, SessionError> {
        Ok(self.store_for(View::DealStream)?.pipeline_summary())
    }

    pub fn edit_deal(
        &self,
        name: &str,
        stage: Stage,
        probability: Probability,
    ) -> Result<Deal, SessionError> {
        Ok(self
            .store_for(View::DealStream)?
            .edit_deal(name, stage, probability)?)
    }

    pub fn add_deal(&self, deal: NewDeal) -> Result<Deal, SessionError> {
        Ok(self.store_for(View::DealStream)?.add_deal(deal)?)
    }

    pub fn filter_prospects(&self, filter: &ProspectFilter) -> Result<Vec<Prospect>, SessionError> {
        Ok(self.store_for(View::Hunter)?.list_prospects(filter))
    }

    pub fn promote(&self, company: &str) -> Result<Deal, SessionError> {
        let store = self.store_for(View::Hunter)?;
        let identity = self.identity.ok_or(SessionError::NotAuthenticated)?;
        let promotion = Promotion::new(identity.home_entity())
            .with_valuation_ratio(self.config.valuation_ratio);
        Ok(store.promote_prospect(company, &promotion)?)
    }

    pub fn central_command(&self) -> Result<CommandSummary, SessionError> {
        let summary = self.store_for(View::CentralCommand)?.pipeline_summary();
        Ok(CommandSummary {
            total_system_value: summary.total_value,
            deal_count: summary.deal_count,
            sites: ops::sites(),
        })
    }

    pub fn group_cockpit(&self) -> Result<Vec<Alert>, SessionError> {
        self.authorize_any(&[View::GroupCockpit, View::GroupOverlay])?;
        Ok(ops::collect_alerts(
            &ops::fuel_flow(),
            &ops::safety_queue(),
            ops::DEFAULT_DROP_THRESHOLD,
        ))
    }

    pub fn liquid_automation(&self, threshold: f64) -> Result<Option<FlowStatus>, SessionError> {
        self.authorize(View::LiquidAutomation)?;
        Ok(ops::flow_status(&ops::fuel_flow(), threshold))
    }

    pub fn sturrock_safety(&self) -> Result<Vec<SafetyDocument>, SessionError> {
        self.authorize(View::SturrockSafety)?;
        Ok(ops::safety_queue())
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(SessionConfig::default())
    }
}

/// Sessions keyed by id, each behind its own lock so two requests for the
/// same session never interleave.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    config: SessionConfig,
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionRegistry {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn open(&self) -> (Uuid, Arc<Mutex<Session>>) {
        let session = Session::new(self.config);
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.lock().insert(id, handle.clone());
        info!(session = %id, "opened session");
        (id, handle)
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions.lock().get(&id).cloned()
    }

    /// Drop a session and, with it, its tables.
    pub fn close(&self, id: Uuid) -> bool {
        let closed = self.sessions.lock().remove(&id).is_some();
        if closed {
            info!(session = %id, "closed session");
        }
        closed
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
