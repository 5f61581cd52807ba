//! Game state & commitment controller.
//!
//! The leader owns a [`StrategyController`] and feeds it team aggregates once
//! per tick. Everyone else mirrors the controller's outputs from the shared
//! channel through [`StrategyController::adopt`].
mod commitment;
mod game_state;
mod opponent;
mod window;

pub use commitment::{Commitment, CommitmentInputs, next_commitment};
pub use game_state::{GameState, StateInputs};
pub use opponent::{
    OpponentClassifier, OpponentKind, OpponentObservation, PostRushInputs, PostRushPhase,
    counter_commitment,
};
pub use window::{AttackWindow, WindowInputs};

use crate::config::{AgentConfig, TuningProfile};
use crate::sensing::Tick;

/// Team-wide aggregates the leader computes from sensing and messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeamAggregates {
    pub tick: Tick,
    pub leader_health: i32,
    pub team_reserve: i32,
    /// Hostiles the leader currently senses.
    pub threat: i32,
    /// Hostiles inside the leader's emergency radius.
    pub hostiles_near_leader: i32,
    /// Friendly ordinary agents minus hostile ordinary agents in view.
    pub army_advantage: i32,
    pub hostile_leader_health: Option<i32>,
    pub hostile_leader_confirmed: bool,
    pub kills: i32,
}

/// Changes produced by one [`StrategyController::update`]. `None` means unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrategyUpdate {
    pub game_state: Option<GameState>,
    pub commitment: Option<Commitment>,
    pub window: Option<AttackWindow>,
    pub opponent: Option<OpponentKind>,
    pub post_rush: Option<PostRushPhase>,
    /// Set on the tick a survived rush is first recorded.
    pub rush_survived: Option<Tick>,
    /// Commitment just reached AllIn from a lower level.
    pub all_in_started: bool,
}

impl StrategyUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyController {
    game_state: GameState,
    commitment: Commitment,
    window: AttackWindow,
    post_rush: PostRushPhase,
    classifier: OpponentClassifier,
}

impl StrategyController {
    pub fn new(profile: &TuningProfile) -> Self {
        Self {
            game_state: GameState::default(),
            commitment: Commitment::starting(profile),
            window: AttackWindow::None,
            post_rush: PostRushPhase::None,
            classifier: OpponentClassifier::new(),
        }
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    pub fn window(&self) -> AttackWindow {
        self.window
    }

    pub fn post_rush(&self) -> PostRushPhase {
        self.post_rush
    }

    pub fn classifier(&self) -> &OpponentClassifier {
        &self.classifier
    }

    /// Overwrites the mirrored outputs with values read from the channel.
    pub fn adopt(&mut self, game_state: GameState, commitment: Commitment, window: AttackWindow) {
        self.game_state = game_state;
        self.commitment = commitment;
        self.window = window;
    }

    /// Restores a survived-rush tick published by an earlier leader instance.
    pub fn restore_rush_survived(&mut self, tick: Option<Tick>) {
        self.classifier.restore_rush_survived(tick);
    }

    /// Runs one leader evaluation.
    ///
    /// Order: classify the opponent, open or close attack windows against the
    /// previous game state, move the commitment ladder, then the game state.
    /// All fields are assigned together at the end.
    pub fn update(&mut self, agg: &TeamAggregates, config: &AgentConfig) -> StrategyUpdate {
        let mut classifier = self.classifier.clone();
        let rush_before = classifier.rush_survived_at();
        let opponent_changed = classifier.observe(
            &OpponentObservation {
                tick: agg.tick,
                hostiles_near_leader: agg.hostiles_near_leader,
                hostiles_visible: agg.threat,
                hostile_leader_health: agg.hostile_leader_health,
            },
            &config.opponent,
        );

        let recently_rushed = classifier.recently_rushed(agg.tick, &config.opponent);
        let post_rush = classifier.post_rush_phase(
            agg.tick,
            &PostRushInputs {
                leader_health: agg.leader_health,
                team_reserve: agg.team_reserve,
                army_advantage: agg.army_advantage,
                hostile_leader_health: agg.hostile_leader_health,
            },
            &config.opponent,
        );

        let window = AttackWindow::detect(
            &WindowInputs {
                tick: agg.tick,
                game_state: self.game_state,
                leader_health: agg.leader_health,
                team_reserve: agg.team_reserve,
                army_advantage: agg.army_advantage,
                hostile_leader_health: agg.hostile_leader_health,
                hostiles_near_leader: agg.hostiles_near_leader,
                recently_rushed,
                opponent: classifier.kind(),
            },
            &config.windows,
        );

        let commitment = next_commitment(
            self.commitment,
            &CommitmentInputs {
                threat: agg.threat,
                team_reserve: agg.team_reserve,
                leader_health: agg.leader_health,
                hostile_leader_health: agg.hostile_leader_health,
                hostile_leader_confirmed: agg.hostile_leader_confirmed,
                army_advantage: agg.army_advantage,
                kills: agg.kills,
            },
            counter_commitment(classifier.kind(), recently_rushed, post_rush),
            window.commitment_floor(),
            &config.commitment,
        );

        let game_state = self.game_state.next(
            &StateInputs {
                leader_health: agg.leader_health,
                team_reserve: agg.team_reserve,
                threat: agg.threat,
                hostile_leader_health: agg.hostile_leader_health,
                army_advantage: agg.army_advantage,
            },
            &config.game_state,
            &config.profile,
        );

        let update = StrategyUpdate {
            game_state: changed(self.game_state, game_state),
            commitment: changed(self.commitment, commitment),
            window: changed(self.window, window),
            opponent: opponent_changed.then_some(classifier.kind()),
            post_rush: changed(self.post_rush, post_rush),
            rush_survived: match (rush_before, classifier.rush_survived_at()) {
                (None, Some(at)) => Some(at),
                _ => None,
            },
            all_in_started: commitment == Commitment::AllIn && self.commitment != Commitment::AllIn,
        };

        self.classifier = classifier;
        self.game_state = game_state;
        self.commitment = commitment;
        self.window = window;
        self.post_rush = post_rush;
        update
    }
}

fn changed<T: PartialEq>(old: T, new: T) -> Option<T> {
    if old != new { Some(new) } else { None }
}
