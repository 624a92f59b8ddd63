//! Experience and leveling arithmetic.
//!
//! Pure functions of (level, experience, accuracy). The accuracy is a
//! fraction in [0, 1] that is multiplied by 100 before scaling the base gain,
//! so the raw gain almost always saturates at the upper clamp bound.

use crate::neo4j::models::LevelUpResult;

/// Fraction of the level requirement granted at minimum
const MIN_GAIN_RATIO: f64 = 0.05;
/// Fraction of the level requirement granted at most
const MAX_GAIN_RATIO: f64 = 0.2;
/// Growth exponent shared by the requirement and base gain curves
const LEVEL_EXPONENT: f64 = 1.8;

/// Experience needed to leave `level`: `round(level^1.8 + 4 * level)`
pub fn required_experience(level: u32) -> u64 {
    let level = f64::from(level);
    (level.powf(LEVEL_EXPONENT) + level * 4.0).round() as u64
}

/// Unclamped base gain for `level`: `floor(10 * level^1.8)`
pub fn base_gain(level: u32) -> u64 {
    (10.0 * f64::from(level).powf(LEVEL_EXPONENT)).floor() as u64
}

/// Experience gained for one round played at `level` with `accuracy`.
///
/// The raw gain `base_gain * accuracy * 100` is clamped to
/// `[floor(5% of requirement), floor(20% of requirement)]` and floored.
pub fn experience_gain(level: u32, accuracy: f64) -> u64 {
    let required = required_experience(level) as f64;
    let raw = base_gain(level) as f64 * (accuracy * 100.0);
    let min = (required * MIN_GAIN_RATIO).floor();
    let max = (required * MAX_GAIN_RATIO).floor();

    raw.min(max).max(min).floor() as u64
}

/// Add one round's gain and consume as many level thresholds as it covers.
pub fn apply_round(level: u32, experience: u64, accuracy: f64) -> LevelUpResult {
    let experience_gained = experience_gain(level, accuracy);
    let mut current_level = level.max(1);
    let mut current_experience = experience.saturating_add(experience_gained);

    loop {
        let required = required_experience(current_level);
        if current_experience < required {
            break;
        }
        // Level is capped; surplus experience stays banked
        let Some(next_level) = current_level.checked_add(1) else {
            break;
        };
        current_experience -= required;
        current_level = next_level;
        tracing::debug!(
            level = current_level,
            required,
            remaining = current_experience,
            "Level up"
        );
    }

    LevelUpResult {
        new_level: current_level,
        remaining_experience: current_experience,
        experience_gained,
    }
}
