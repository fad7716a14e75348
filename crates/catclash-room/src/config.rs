//! Game configuration and the room lifecycle state machine.

use std::time::Duration;

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Tunables for a match: initial player values, resource limits, and the
/// tick cadence. The defaults are the balanced production values; tests
/// override individual fields to set up scenarios.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Starting (and starting maximum) health.
    pub initial_health: f64,
    pub initial_money: f64,
    pub initial_energy: f64,
    pub initial_food: f64,
    pub initial_click_power: f64,
    pub base_money_per_second: f64,
    pub base_energy_per_second: f64,
    /// Energy is capped here; reaching the cap unlocks the energy choice.
    pub energy_cap: f64,
    /// Energy debited per unit of food bought.
    pub energy_per_food: f64,
    /// Fixed simulation step.
    pub tick_period: Duration,
    /// Upper bound on the random delay added to a room's first tick, so
    /// rooms created in the same instant don't all tick together.
    pub tick_jitter: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_health: 10_000.0,
            initial_money: 50.0,
            initial_energy: 100.0,
            initial_food: 0.0,
            initial_click_power: 1.0,
            base_money_per_second: 0.0,
            base_energy_per_second: 1.0,
            energy_cap: 1000.0,
            energy_per_food: 10.0,
            tick_period: Duration::from_secs(1),
            tick_jitter: Duration::from_millis(2),
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// Transitions are strictly ordered, no skipping and no going back:
///
/// ```text
/// Waiting → Active → Ended
/// ```
///
/// - **Waiting**: up to two participants seated, not all ready. Accepts
///   joins and ready declarations.
/// - **Active**: both seats ready; the tick loop runs and gameplay
///   actions are accepted.
/// - **Ended**: a winner was recorded (or everyone left). Terminal; the
///   room only awaits destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Active,
    Ended,
}

impl Phase {
    /// Returns `true` if the room is accepting new participants.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` if the match is running.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns `true` if the match is over.
    pub fn is_over(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::Active => write!(f, "Active"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_predicates() {
        assert!(Phase::Waiting.is_joinable());
        assert!(!Phase::Active.is_joinable());
        assert!(!Phase::Ended.is_joinable());

        assert!(!Phase::Waiting.is_active());
        assert!(Phase::Active.is_active());
        assert!(!Phase::Ended.is_active());

        assert!(Phase::Ended.is_over());
        assert!(!Phase::Active.is_over());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Waiting.to_string(), "Waiting");
        assert_eq!(Phase::Active.to_string(), "Active");
        assert_eq!(Phase::Ended.to_string(), "Ended");
    }

    #[test]
    fn test_config_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.initial_health, 10_000.0);
        assert_eq!(config.initial_money, 50.0);
        assert_eq!(config.energy_cap, 1000.0);
        assert_eq!(config.energy_per_food, 10.0);
        assert_eq!(config.tick_period, Duration::from_secs(1));
    }
}
