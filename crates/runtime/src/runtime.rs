//! Per-agent tick orchestrator.
//!
//! [`AgentRuntime`] owns one agent's configuration and [`AgentContext`] and
//! turns each sensing snapshot into at most one interaction, one turn and
//! one step. The host drives it once per tick with its [`Actuator`] and
//! [`ChannelIo`] bindings.
use agent_core::{
    AgentConfig, Direction, Fallback, Objective, SensingSnapshot, Tick, TuningProfile, Weights,
    gather_candidates, select_target,
};

use crate::api::{Actuator, ChannelIo, Result};
use crate::channel::TeamView;
use crate::config::{Arena, RuntimeConfig};
use crate::context::AgentContext;
use crate::movement;
use crate::priority::{self, ActionTaken, Immediate};
use crate::roles::{LeaderReport, LeaderState, PlanInputs, Role, Specialty};

/// Summary of one tick, for hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    pub role: Role,
    pub specialty: Option<Specialty>,
    pub objective: Objective,
    pub action: Option<ActionTaken>,
    pub turned: Option<Direction>,
    pub moved: Option<Direction>,
    /// Broadcasts sent by a follower this tick.
    pub broadcasts: u32,
    /// Present when the agent acted as leader.
    pub leader: Option<LeaderReport>,
}

/// Decision loop for one agent.
#[derive(Clone, Debug)]
pub struct AgentRuntime {
    config: RuntimeConfig,
    context: AgentContext,
}

impl AgentRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn new(config: RuntimeConfig) -> Result<Self> {
        config.validate()?;
        let context = AgentContext::new(&config.agent.profile);
        Ok(Self { config, context })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn context(&self) -> &AgentContext {
        &self.context
    }

    /// Runs one decision tick.
    ///
    /// Order: classify the role, do leader duty or read the team view,
    /// choose the objective, plan, run the immediate-action selector, move,
    /// then broadcast. Host refusals are logged and never abort the tick.
    pub fn tick(
        &mut self,
        snapshot: &SensingSnapshot,
        actuator: &mut impl Actuator,
        io: &mut impl ChannelIo,
    ) -> TickReport {
        let config = &self.config;
        let ctx = &mut self.context;
        ctx.bind(snapshot.id, &config.agent.profile);

        let role = Role::classify(snapshot.id, snapshot.kind, &config.agent.roles);
        ctx.assume(role);

        let (view, leader_report) = if role == Role::Leader {
            let leader = ctx.leader.get_or_insert_with(LeaderState::new);
            let report = leader.run(snapshot, &mut ctx.strategy, io, config);
            (leader.view(snapshot, &ctx.strategy, config), Some(report))
        } else {
            let view = TeamView::read(&mut ctx.cache, &*io, snapshot.tick, &config.agent.channel);
            ctx.strategy.adopt(view.game_state, view.commitment, view.window);
            (view, None)
        };

        let objective = choose_objective(snapshot, &view, ctx, &config.agent);
        ctx.objective = objective;

        let plan = role.plan(&PlanInputs {
            snapshot,
            view: &view,
            objective,
            config,
        });

        let mut immediate = Immediate::new(snapshot, &plan, config, &mut ctx.kite);
        let action = priority::run(&mut immediate, actuator);
        let (kite_intent, turned) = (immediate.kite_intent, immediate.turned);

        let intent = movement::resolve(snapshot, &plan, kite_intent, &config.agent.nav);
        let moved = movement::execute(
            &mut ctx.navigator,
            snapshot,
            intent,
            plan.charge_anchor,
            actuator,
            &config.agent.nav,
        );

        let killed = matches!(action, Some(ActionTaken::Attack { killed: true, .. }));
        let broadcasts = match ctx.leader.as_mut() {
            Some(leader) if role == Role::Leader => {
                if killed {
                    leader.record_kill();
                }
                0
            }
            _ => ctx
                .reporter
                .report(snapshot, &view, action, io, &config.agent.channel),
        };

        tracing::debug!(
            "{} tick {}: {} {} -> {:?}, action {:?}, moved {:?}",
            snapshot.id,
            snapshot.tick,
            role,
            objective.kind,
            intent,
            action,
            moved
        );

        TickReport {
            tick: snapshot.tick,
            role,
            specialty: plan.specialty,
            objective,
            action,
            turned,
            moved,
            broadcasts,
            leader: leader_report,
        }
    }
}

fn choose_objective(
    snapshot: &SensingSnapshot,
    view: &TeamView,
    ctx: &AgentContext,
    config: &AgentConfig,
) -> Objective {
    let weights = Weights::for_state(ctx.strategy.game_state(), &config.profile);
    let candidates = gather_candidates(snapshot, &view.situation(), &config.value);
    let fallback = Fallback {
        hostile_leader: view.hostile_leader_estimate(),
        patrol: view.own_leader,
    };
    select_target(&candidates, &weights, fallback, &config.value)
}

/// Builder for [`AgentRuntime`].
#[derive(Debug, Clone, Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    #[cfg(feature = "content")]
    profile_name: Option<String>,
    #[cfg(feature = "content")]
    catalog: agent_content::ProfileCatalog,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the decision-core configuration, keeping the arena.
    pub fn agent_config(mut self, agent: AgentConfig) -> Self {
        self.config.agent = agent;
        self
    }

    pub fn arena(mut self, width: i32, height: i32) -> Self {
        self.config.arena = Arena::new(width, height);
        self
    }

    pub fn profile(mut self, profile: TuningProfile) -> Self {
        self.config.agent.profile = profile;
        self
    }

    /// Use a built-in tuning preset.
    #[cfg(feature = "content")]
    pub fn preset(mut self, preset: agent_content::Preset) -> Self {
        self.config.agent.profile = preset.profile();
        self
    }

    /// Profiles that [`RuntimeBuilder::profile_name`] may refer to, on top of
    /// the built-in presets.
    #[cfg(feature = "content")]
    pub fn catalog(mut self, catalog: agent_content::ProfileCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Resolve a profile by name when building: the catalog first, then the
    /// built-in presets.
    ///
    /// Unknown names fail [`RuntimeBuilder::build`] with
    /// [`RuntimeError::UnknownProfile`](crate::api::RuntimeError::UnknownProfile).
    #[cfg(feature = "content")]
    pub fn profile_name(mut self, name: impl Into<String>) -> Self {
        self.profile_name = Some(name.into());
        self
    }

    pub fn build(self) -> Result<AgentRuntime> {
        #[allow(unused_mut)]
        let mut config = self.config;
        #[cfg(feature = "content")]
        if let Some(name) = self.profile_name {
            config.agent.profile = self
                .catalog
                .get(&name)
                .ok_or(crate::api::RuntimeError::UnknownProfile { name })?;
        }
        AgentRuntime::new(config)
    }
}
