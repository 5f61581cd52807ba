//! Agent configuration constants and tunable parameters.
//!
//! Every threshold the decision core consults lives here, grouped by the
//! component that reads it. `Default` reproduces the tuned values the bot
//! shipped with; `agent-content` can override any subset from TOML.

use crate::grid::Position;

/// Top-level tuning bundle handed to every decision component.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    pub nav: NavConfig,
    pub value: ValueConfig,
    pub game_state: StateThresholds,
    pub commitment: CommitmentConfig,
    pub opponent: OpponentConfig,
    pub windows: WindowConfig,
    pub kite: KiteConfig,
    pub channel: ChannelConfig,
    pub roles: RoleConfig,
    pub profile: TuningProfile,
}

impl AgentConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum hostile/ally entities kept from one sensing snapshot.
    pub const MAX_SENSED_ENTITIES: usize = 32;
    /// Maximum resource-bearing cells kept from one sensing snapshot.
    pub const MAX_RESOURCE_CELLS: usize = 16;
    /// Maximum broadcast messages consumed per tick.
    pub const MAX_MESSAGES: usize = 8;
    /// Resource locations remembered from the shared channel.
    pub const MAX_REMEMBERED_RESOURCES: usize = 3;
    /// Delivery + every entity + every sensed or remembered resource.
    pub const MAX_CANDIDATES: usize = 1
        + Self::MAX_SENSED_ENTITIES
        + Self::MAX_RESOURCE_CELLS
        + Self::MAX_REMEMBERED_RESOURCES;
    /// Number of slots in the shared channel.
    pub const SLOT_COUNT: usize = 64;
    /// Largest value a single slot can hold (10 bits).
    pub const SLOT_MAX: u16 = 1023;

    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with a different tuning profile applied.
    pub fn with_profile(profile: TuningProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }
}

// ============================================================================
// Tuning profile
// ============================================================================

/// Percent multipliers applied on top of the state weights and reserves.
///
/// `100` leaves a value unchanged. Attack scales the hostile weights,
/// economy scales resource/delivery weights and reserve thresholds, defence
/// scales guardian ring radii.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TuningProfile {
    pub attack: i32,
    pub defense: i32,
    pub economy: i32,
}

impl TuningProfile {
    pub const BALANCED: Self = Self::new(100, 100, 100);

    pub const fn new(attack: i32, defense: i32, economy: i32) -> Self {
        Self {
            attack,
            defense,
            economy,
        }
    }

    #[inline]
    pub const fn scale_attack(&self, value: i32) -> i32 {
        value * self.attack / 100
    }

    #[inline]
    pub const fn scale_defense(&self, value: i32) -> i32 {
        value * self.defense / 100
    }

    #[inline]
    pub const fn scale_economy(&self, value: i32) -> i32 {
        value * self.economy / 100
    }
}

impl Default for TuningProfile {
    fn default() -> Self {
        Self::BALANCED
    }
}

// ============================================================================
// Navigator
// ============================================================================

/// Which way the navigator sweeps around an obstacle once wall-following.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RotationSense {
    /// Clockwise for destinations with even `x + y`, counter-clockwise otherwise.
    /// Agents converging on different points split across both sides.
    #[default]
    FromDestinationParity,
    Clockwise,
    CounterClockwise,
}

impl RotationSense {
    /// Resolves the sense for a concrete destination. `true` means clockwise.
    #[inline]
    pub const fn is_clockwise(self, destination: Position) -> bool {
        match self {
            Self::FromDestinationParity => (destination.x + destination.y) & 1 == 0,
            Self::Clockwise => true,
            Self::CounterClockwise => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    /// Squared radius around the charge anchor inside which hazards are ignored.
    pub charge_radius_sq: i32,
    pub rotation: RotationSense,
    /// Hazard entities closer than this trigger an immediate flee.
    pub hazard_flee_radius_sq: i32,
}

impl NavConfig {
    pub const DEFAULT_CHARGE_RADIUS_SQ: i32 = 16;
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            charge_radius_sq: Self::DEFAULT_CHARGE_RADIUS_SQ,
            rotation: RotationSense::default(),
            hazard_flee_radius_sq: 18,
        }
    }
}

// ============================================================================
// Value function
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValueConfig {
    pub distance_decay: i32,
    /// Candidates must score strictly above this to beat the fallbacks.
    pub score_floor: i32,

    pub hostile_leader_base: i32,
    pub hostile_ordinary_base: i32,
    pub resource_base: i32,
    pub resource_low_base: i32,
    pub resource_critical_base: i32,
    pub delivery_base: i32,

    /// Team reserve below which resources use `resource_low_base`.
    pub low_reserve: i32,
    /// Team reserve below which resources use `resource_critical_base`.
    pub critical_reserve: i32,

    pub wounded_leader_health: i32,
    pub wounded_leader_bonus: i32,
    pub window_leader_bonus: i32,

    pub focus_fire_bonus: i32,
    pub focus_fire_radius_sq: i32,

    pub home_territory_radius_sq: i32,
    pub home_territory_bonus: i32,

    /// Radius used for "near our leader" / "near their leader" tests.
    pub leader_vicinity_sq: i32,
    pub raid_carrier_bonus: i32,
    pub raid_escort_bonus: i32,
    pub raid_weak_health: i32,
    pub raid_weak_bonus: i32,
    pub raid_leader_penalty: i32,
    pub assault_leader_bonus: i32,
    pub assault_blocker_bonus: i32,
    pub defend_intruder_bonus: i32,
    pub defend_carrier_bonus: i32,
    pub probe_penalty: i32,

    pub all_in_leader_bonus: i32,

    pub overkill_health: i32,
    pub overkill_damage_per_ally: i32,
    pub overkill_penalty: i32,

    pub fallback_leader_score: i32,
    pub patrol_score: i32,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            distance_decay: 15,
            score_floor: 0,
            hostile_leader_base: 200,
            hostile_ordinary_base: 60,
            resource_base: 100,
            resource_low_base: 150,
            resource_critical_base: 200,
            delivery_base: 150,
            low_reserve: 600,
            critical_reserve: 150,
            wounded_leader_health: 250,
            wounded_leader_bonus: 100,
            window_leader_bonus: 150,
            focus_fire_bonus: 80,
            focus_fire_radius_sq: 2,
            home_territory_radius_sq: 144,
            home_territory_bonus: 100,
            leader_vicinity_sq: 36,
            raid_carrier_bonus: 500,
            raid_escort_bonus: 300,
            raid_weak_health: 30,
            raid_weak_bonus: 200,
            raid_leader_penalty: 200,
            assault_leader_bonus: 1000,
            assault_blocker_bonus: 400,
            defend_intruder_bonus: 800,
            defend_carrier_bonus: 300,
            probe_penalty: 100,
            all_in_leader_bonus: 500,
            overkill_health: 20,
            overkill_damage_per_ally: 10,
            overkill_penalty: 200,
            fallback_leader_score: 50,
            patrol_score: 1,
        }
    }
}

// ============================================================================
// Game state hysteresis
// ============================================================================

/// Enter/exit thresholds for the Survive/Pressure/Execute machine.
///
/// Reserve thresholds are scaled by the economy multiplier at evaluation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StateThresholds {
    pub survive_enter_health: i32,
    pub survive_exit_health: i32,
    pub survive_enter_reserve: i32,
    pub survive_exit_reserve: i32,
    pub survive_enter_threat: i32,
    pub survive_exit_threat: i32,
    pub execute_enter_hostile_health: i32,
    pub execute_exit_hostile_health: i32,
    pub execute_enter_advantage: i32,
    pub execute_exit_advantage: i32,
    /// Reserve required alongside the advantage trigger.
    pub execute_min_reserve: i32,
}

impl Default for StateThresholds {
    fn default() -> Self {
        Self {
            survive_enter_health: 300,
            survive_exit_health: 400,
            survive_enter_reserve: 200,
            survive_exit_reserve: 400,
            survive_enter_threat: 6,
            survive_exit_threat: 3,
            execute_enter_hostile_health: 200,
            execute_exit_hostile_health: 250,
            execute_enter_advantage: 50,
            execute_exit_advantage: 20,
            execute_min_reserve: 500,
        }
    }
}

// ============================================================================
// Commitment ladder
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CommitmentConfig {
    /// Any of these crossing drops the ladder straight to Defend.
    pub danger_threat: i32,
    pub danger_reserve: i32,
    pub danger_health: i32,

    pub all_in_hostile_health: i32,
    pub all_in_min_health: i32,
    pub assault_advantage: i32,
    pub raid_kills: i32,
}

impl Default for CommitmentConfig {
    fn default() -> Self {
        Self {
            danger_threat: 3,
            danger_reserve: 150,
            danger_health: 300,
            all_in_hostile_health: 200,
            all_in_min_health: 200,
            assault_advantage: 30,
            raid_kills: 2,
        }
    }
}

// ============================================================================
// Opponent classifier
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OpponentConfig {
    pub rush_detection_tick: u32,
    pub rush_hostile_threshold: i32,
    pub turtle_detection_tick: u32,
    pub turtle_hostile_threshold: i32,
    pub desperate_health: i32,
    /// Ticks after surviving a rush during which post-rush phases apply.
    pub post_rush_duration: u32,
    pub stabilize_ticks: u32,
    pub stabilize_health: i32,
    pub stabilize_reserve: i32,
    pub leader_assault_advantage: i32,
    pub leader_assault_hostile_health: i32,
    pub assault_prep_ticks: u32,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            rush_detection_tick: 30,
            rush_hostile_threshold: 3,
            turtle_detection_tick: 50,
            turtle_hostile_threshold: 2,
            desperate_health: 100,
            post_rush_duration: 80,
            stabilize_ticks: 10,
            stabilize_health: 200,
            stabilize_reserve: 300,
            leader_assault_advantage: 40,
            leader_assault_hostile_health: 200,
            assault_prep_ticks: 50,
        }
    }
}

// ============================================================================
// Attack windows
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WindowConfig {
    pub wounded_leader_health: i32,
    pub army_advantage: i32,
    pub army_min_health: i32,
    pub economy_reserve: i32,
    pub economy_min_health: i32,
    pub turtle_punish_tick: u32,
    pub late_game_tick: u32,
    /// Threat level at or above which no window opens.
    pub emergency_threat: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            wounded_leader_health: 350,
            army_advantage: 3,
            army_min_health: 250,
            economy_reserve: 800,
            economy_min_health: 300,
            turtle_punish_tick: 100,
            late_game_tick: 250,
            emergency_threat: 3,
        }
    }
}

// ============================================================================
// Kiting
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KiteConfig {
    /// At or above this health the agent skips retreat and keeps attacking.
    pub healthy_health: i32,
    pub wounded_health: i32,
    pub critical_health: i32,
    pub retreat_steps: u8,
    pub wounded_retreat_steps: u8,
    pub critical_retreat_steps: u8,
    /// Squared distance at which Approach hands over to Attack.
    pub engage_distance_sq: i32,
}

impl Default for KiteConfig {
    fn default() -> Self {
        Self {
            healthy_health: 80,
            wounded_health: 60,
            critical_health: 40,
            retreat_steps: 1,
            wounded_retreat_steps: 2,
            critical_retreat_steps: 3,
            engage_distance_sq: 2,
        }
    }
}

// ============================================================================
// Shared channel
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChannelConfig {
    pub focus_stale_ticks: u16,
    pub resource_stale_ticks: u16,
    pub all_in_duration: u16,
    pub sighting_stale_ticks: u16,
    pub position_cache_interval: u32,
    pub strategy_cache_interval: u32,
    pub ring_cache_interval: u32,
    /// Heartbeat slots are rewritten at most this often even when unchanged.
    pub write_interval: u32,
    /// Minimum ticks between two broadcasts of the same kind by one agent.
    pub broadcast_throttle: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            focus_stale_ticks: 2,
            resource_stale_ticks: 50,
            all_in_duration: 100,
            sighting_stale_ticks: 20,
            position_cache_interval: 2,
            strategy_cache_interval: 3,
            ring_cache_interval: 5,
            write_interval: 10,
            broadcast_throttle: 10,
        }
    }
}

// ============================================================================
// Roles
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoleConfig {
    /// `id % 100` below this is a guardian.
    pub guardian_percent: u32,
    /// `id % 100` below this (and not a guardian) is flex.
    pub flex_percent: u32,
    pub assassin_divisor: u32,
    pub guardian_inner_sq: i32,
    pub guardian_outer_sq: i32,
    /// Guardians engage hostiles within this squared distance of the leader.
    pub guardian_engage_sq: i32,
    pub delivery_range_sq: i32,
    /// Hostiles this close to the leader count towards the emergency level.
    pub leader_threat_radius_sq: i32,
    /// Specialists scout until this tick unless the hostile leader is confirmed.
    pub early_game_tick: u32,
    /// Every specialist switches to assassin from this tick.
    pub assassin_tick: u32,
    pub assassin_hostile_health: i32,
    /// Inside this squared distance of the hostile leader, assassins ignore
    /// everything that is not blocking them.
    pub assassin_bypass_sq: i32,
    /// Scouts start circling once this close to the estimated hostile leader.
    pub scout_spiral_sq: i32,
    pub scout_spiral_offset: i32,
}

impl RoleConfig {
    const MIN_GUARDIAN_INNER_SQ: i32 = 2;
    const MIN_GUARDIAN_OUTER_SQ: i32 = 8;

    /// Guardian ring radii after applying the defence multiplier.
    pub fn guardian_ring(&self, profile: &TuningProfile) -> (i32, i32) {
        let inner = profile
            .scale_defense(self.guardian_inner_sq)
            .max(Self::MIN_GUARDIAN_INNER_SQ);
        let outer = profile
            .scale_defense(self.guardian_outer_sq)
            .max(Self::MIN_GUARDIAN_OUTER_SQ)
            .max(inner + 1);
        (inner, outer)
    }
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            guardian_percent: 5,
            flex_percent: 80,
            assassin_divisor: 5,
            guardian_inner_sq: 5,
            guardian_outer_sq: 13,
            guardian_engage_sq: 25,
            delivery_range_sq: 9,
            leader_threat_radius_sq: 25,
            early_game_tick: 50,
            assassin_tick: 200,
            assassin_hostile_health: 200,
            assassin_bypass_sq: 144,
            scout_spiral_sq: 16,
            scout_spiral_offset: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_scales_by_percent() {
        let rush = TuningProfile::new(180, 50, 60);
        assert_eq!(rush.scale_attack(100), 180);
        assert_eq!(rush.scale_defense(13), 6);
        assert_eq!(rush.scale_economy(400), 240);
        assert_eq!(TuningProfile::default(), TuningProfile::BALANCED);
    }

    #[test]
    fn rotation_sense_follows_destination_parity() {
        let sense = RotationSense::FromDestinationParity;
        assert!(sense.is_clockwise(Position::new(4, 6)));
        assert!(!sense.is_clockwise(Position::new(4, 7)));
        assert!(RotationSense::Clockwise.is_clockwise(Position::new(1, 0)));
        assert!(!RotationSense::CounterClockwise.is_clockwise(Position::new(0, 0)));
    }

    #[test]
    fn guardian_ring_respects_minimums() {
        let roles = RoleConfig::default();
        assert_eq!(roles.guardian_ring(&TuningProfile::BALANCED), (5, 13));
        assert_eq!(roles.guardian_ring(&TuningProfile::new(100, 150, 100)), (7, 19));
        let (inner, outer) = roles.guardian_ring(&TuningProfile::new(100, 10, 100));
        assert_eq!(inner, 2);
        assert_eq!(outer, 8);
    }

    #[test]
    fn capacity_constants_are_consistent() {
        assert!(AgentConfig::MAX_CANDIDATES > AgentConfig::MAX_SENSED_ENTITIES);
        assert_eq!(AgentConfig::MAX_REMEMBERED_RESOURCES, 3);
        assert_eq!(AgentConfig::SLOT_MAX, (1 << 10) - 1);
    }
}
