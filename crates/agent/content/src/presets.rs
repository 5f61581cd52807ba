//! Built-in tuning profiles.

use agent_core::{AgentConfig, TuningProfile};

/// Named tuning profile shipped with the bot.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Preset {
    #[default]
    Balanced,
    /// Early pressure, thinner economy.
    Aggressive,
    Defensive,
    /// All-out early attack; starts at Assault.
    Rush,
    /// Economy and defence first; starts at Defend.
    Turtle,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Balanced,
        Preset::Aggressive,
        Preset::Defensive,
        Preset::Rush,
        Preset::Turtle,
    ];

    pub const fn profile(self) -> TuningProfile {
        match self {
            Preset::Balanced => TuningProfile::BALANCED,
            Preset::Aggressive => TuningProfile::new(150, 70, 80),
            Preset::Defensive => TuningProfile::new(60, 150, 130),
            Preset::Rush => TuningProfile::new(180, 50, 60),
            Preset::Turtle => TuningProfile::new(40, 180, 150),
        }
    }

    /// Default configuration with this preset's profile applied.
    pub fn config(self) -> AgentConfig {
        AgentConfig::with_profile(self.profile())
    }
}
