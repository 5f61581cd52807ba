//! Per-agent state carried from one tick to the next.
use agent_core::{
    BugNavigator, EntityId, KiteMachine, Objective, StrategyController, TuningProfile,
};

use crate::channel::ChannelCache;
use crate::report::Reporter;
use crate::roles::{LeaderState, Role};

/// Everything one agent remembers between ticks.
///
/// The context belongs to a single agent id; ticking it with a snapshot for
/// another id starts over from a fresh context.
#[derive(Clone, Debug)]
pub struct AgentContext {
    id: Option<EntityId>,
    role: Option<Role>,
    pub(crate) navigator: BugNavigator,
    pub(crate) kite: KiteMachine,
    pub(crate) cache: ChannelCache,
    pub(crate) strategy: StrategyController,
    pub(crate) leader: Option<LeaderState>,
    pub(crate) reporter: Reporter,
    pub(crate) objective: Objective,
}

impl AgentContext {
    pub fn new(profile: &TuningProfile) -> Self {
        Self {
            id: None,
            role: None,
            navigator: BugNavigator::new(),
            kite: KiteMachine::new(),
            cache: ChannelCache::new(),
            strategy: StrategyController::new(profile),
            leader: None,
            reporter: Reporter::new(),
            objective: Objective::NONE,
        }
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Objective chosen on the most recent tick.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn strategy(&self) -> &StrategyController {
        &self.strategy
    }

    pub fn navigator(&self) -> &BugNavigator {
        &self.navigator
    }

    pub fn kite(&self) -> &KiteMachine {
        &self.kite
    }

    /// Leader duty state, present once the agent has acted as leader.
    pub fn leader(&self) -> Option<&LeaderState> {
        self.leader.as_ref()
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub(crate) fn bind(&mut self, id: EntityId, profile: &TuningProfile) {
        if self.id == Some(id) {
            return;
        }
        if let Some(previous) = self.id {
            tracing::debug!("context rebound from {} to {}", previous, id);
        }
        *self = Self::new(profile);
        self.id = Some(id);
    }

    pub(crate) fn assume(&mut self, role: Role) {
        if self.role != Some(role) {
            if let (Some(id), Some(previous)) = (self.id, self.role) {
                tracing::debug!("{} role {} -> {}", id, previous, role);
            }
            self.role = Some(role);
        }
    }
}
