use crate::config::ValueConfig;
use crate::grid::Position;

use super::{Candidate, Objective, ObjectiveKind, Weights};

/// Weighted, distance-decayed score.
///
/// Decay is linear-inverse in squared distance, so a valuable target far away
/// still outranks a worthless one nearby.
#[inline]
pub const fn score(base: i32, weight: i32, distance_sq: i32, decay: i32) -> i32 {
    let weighted = base * weight / 100;
    let denominator = 1000 + distance_sq * decay;
    if denominator <= 0 {
        return weighted;
    }
    weighted * 1000 / denominator
}

/// Fixed objectives used when nothing scores above the floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fallback {
    /// Known or estimated hostile leader location.
    pub hostile_leader: Option<Position>,
    /// Local patrol point, usually the own leader.
    pub patrol: Option<Position>,
}

#[inline]
fn final_score(candidate: &Candidate, weights: &Weights, config: &ValueConfig) -> i32 {
    let decayed = score(
        candidate.base,
        weights.for_kind(candidate.kind),
        candidate.distance_sq,
        config.distance_decay,
    );
    (decayed + candidate.bonus) * candidate.scale_32 / 32
}

/// Picks exactly one objective.
///
/// Highest score wins; equal scores go to the higher-priority category and
/// then to the earlier candidate. Nothing above `score_floor` falls back to
/// the hostile leader, then to the patrol point, then to [`Objective::NONE`].
pub fn select_target(
    candidates: &[Candidate],
    weights: &Weights,
    fallback: Fallback,
    config: &ValueConfig,
) -> Objective {
    let mut best: Option<(&Candidate, i32)> = None;
    for candidate in candidates {
        let value = final_score(candidate, weights, config);
        let better = match best {
            None => true,
            Some((current, current_value)) => {
                value > current_value
                    || (value == current_value
                        && candidate.kind.priority() < current.kind.priority())
            }
        };
        if better {
            best = Some((candidate, value));
        }
    }

    match best {
        Some((candidate, value)) if value > config.score_floor => Objective {
            kind: candidate.kind,
            position: Some(candidate.position),
            target: candidate.target,
            score: value,
        },
        _ => fallback_objective(fallback, config),
    }
}

fn fallback_objective(fallback: Fallback, config: &ValueConfig) -> Objective {
    if let Some(position) = fallback.hostile_leader {
        return Objective {
            kind: ObjectiveKind::HostileLeader,
            position: Some(position),
            target: None,
            score: config.fallback_leader_score,
        };
    }
    if let Some(position) = fallback.patrol {
        return Objective {
            kind: ObjectiveKind::Patrol,
            position: Some(position),
            target: None,
            score: config.patrol_score,
        };
    }
    Objective::NONE
}
