//! Immutable reference catalogs for CatClash.
//!
//! Everything purchasable or selectable in a match is defined here as
//! static tables keyed by id: upgrades, attacks, items, and energy
//! choices. The room engine consumes these read-only; effects are closed
//! enums so adding a new effect kind is a compile-time-checked change.

mod data;

pub use data::{ATTACKS, ENERGY_CHOICES, ITEMS, UPGRADES};

// ---------------------------------------------------------------------------
// Upgrades
// ---------------------------------------------------------------------------

/// What a purchased upgrade level permanently improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeCategory {
    /// Passive money income per second.
    MoneyPassive,
    /// Passive energy income per second.
    EnergyPassive,
    /// Maximum health (current health rises by the same amount).
    HealthMax,
    /// Money granted per manual click.
    ClickPower,
}

/// One repeatable upgrade. Cost scales geometrically with the owned level:
/// `floor(base_cost * cost_multiplier^level)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub category: UpgradeCategory,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    pub effect_per_level: f64,
    /// `None` means unbounded.
    pub max_level: Option<u32>,
}

impl UpgradeDef {
    /// Money cost of buying the next level when `level` are already owned.
    pub fn cost_at(&self, level: u32) -> f64 {
        (self.base_cost * self.cost_multiplier.powi(level as i32)).floor()
    }
}

// ---------------------------------------------------------------------------
// Attacks
// ---------------------------------------------------------------------------

/// Whether an attack lands once or adds permanent damage-per-second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Instant,
    Passive,
}

/// One food-priced attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackDef {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: AttackKind,
    pub damage: f64,
    pub food_cost: f64,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Which resource an item is priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Money,
    Food,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cost {
    pub currency: Currency,
    pub amount: f64,
}

/// What an item does when applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemEffect {
    InstantMoney(f64),
    /// Clamped to the energy cap on application.
    InstantEnergy(f64),
    /// Clamped to max health on application.
    InstantHealth(f64),
    /// Applied to the opponent, scaled by their damage multiplier.
    InstantDamage(f64),
    MoneyPerSecond(f64),
    EnergyPerSecond(f64),
    DamagePerSecond(f64),
    /// Permanently scales click power.
    ClickMultiplier(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDef {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: Cost,
    pub effect: ItemEffect,
    /// Stackables go to the inventory on purchase; single-use items apply
    /// immediately and are discarded.
    pub stackable: bool,
}

// ---------------------------------------------------------------------------
// Energy choices
// ---------------------------------------------------------------------------

/// Effect of the one-time selection forced when energy reaches the cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChoiceEffect {
    /// Applied to the opponent, scaled by their damage multiplier.
    InstantDamage(f64),
    /// Clamped to max health.
    InstantHeal(f64),
    /// Multiplied into the player's running modifiers (compounding).
    PermanentModifier {
        earnings: Option<f64>,
        passive_earnings: Option<f64>,
        damage: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceDef {
    pub id: &'static str,
    pub name: &'static str,
    pub effect: ChoiceEffect,
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

pub fn upgrade(id: &str) -> Option<&'static UpgradeDef> {
    UPGRADES.iter().find(|u| u.id == id)
}

pub fn attack(id: &str) -> Option<&'static AttackDef> {
    ATTACKS.iter().find(|a| a.id == id)
}

pub fn item(id: &str) -> Option<&'static ItemDef> {
    ITEMS.iter().find(|i| i.id == id)
}

pub fn energy_choice(id: &str) -> Option<&'static ChoiceDef> {
    ENERGY_CHOICES.iter().find(|c| c.id == id)
}
