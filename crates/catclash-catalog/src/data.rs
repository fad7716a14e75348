//! The catalog tables. Balance numbers live here and nowhere else.

use crate::{
    AttackDef, AttackKind, ChoiceDef, ChoiceEffect, Cost, Currency, ItemDef, ItemEffect,
    UpgradeCategory, UpgradeDef,
};

pub static UPGRADES: &[UpgradeDef] = &[
    // Passive money
    UpgradeDef {
        id: "scratching_post_basic",
        name: "Basic Scratching Post",
        category: UpgradeCategory::MoneyPassive,
        base_cost: 10.0,
        cost_multiplier: 1.15,
        effect_per_level: 1.0,
        max_level: None,
    },
    UpgradeDef {
        id: "milk_bowl",
        name: "Milk Bowl",
        category: UpgradeCategory::MoneyPassive,
        base_cost: 100.0,
        cost_multiplier: 1.15,
        effect_per_level: 5.0,
        max_level: None,
    },
    UpgradeDef {
        id: "cardboard_box",
        name: "Premium Cardboard Box",
        category: UpgradeCategory::MoneyPassive,
        base_cost: 500.0,
        cost_multiplier: 1.15,
        effect_per_level: 15.0,
        max_level: None,
    },
    UpgradeDef {
        id: "toy_mouse",
        name: "Toy Mouse",
        category: UpgradeCategory::MoneyPassive,
        base_cost: 2000.0,
        cost_multiplier: 1.15,
        effect_per_level: 50.0,
        max_level: None,
    },
    UpgradeDef {
        id: "cat_tower",
        name: "Cat Tower",
        category: UpgradeCategory::MoneyPassive,
        base_cost: 10_000.0,
        cost_multiplier: 1.15,
        effect_per_level: 150.0,
        max_level: None,
    },
    // Passive energy
    UpgradeDef {
        id: "short_nap",
        name: "Short Nap",
        category: UpgradeCategory::EnergyPassive,
        base_cost: 50.0,
        cost_multiplier: 1.2,
        effect_per_level: 1.0,
        max_level: None,
    },
    UpgradeDef {
        id: "medium_nap",
        name: "Medium Nap",
        category: UpgradeCategory::EnergyPassive,
        base_cost: 300.0,
        cost_multiplier: 1.2,
        effect_per_level: 3.0,
        max_level: None,
    },
    UpgradeDef {
        id: "deep_sleep",
        name: "Deep Sleep",
        category: UpgradeCategory::EnergyPassive,
        base_cost: 1500.0,
        cost_multiplier: 1.2,
        effect_per_level: 8.0,
        max_level: None,
    },
    UpgradeDef {
        id: "cat_dream",
        name: "Cat Dream",
        category: UpgradeCategory::EnergyPassive,
        base_cost: 8000.0,
        cost_multiplier: 1.2,
        effect_per_level: 20.0,
        max_level: None,
    },
    // Max health
    UpgradeDef {
        id: "health_boost_1",
        name: "Extra Life I",
        category: UpgradeCategory::HealthMax,
        base_cost: 100.0,
        cost_multiplier: 1.5,
        effect_per_level: 50.0,
        max_level: None,
    },
    UpgradeDef {
        id: "health_boost_2",
        name: "Extra Life II",
        category: UpgradeCategory::HealthMax,
        base_cost: 300.0,
        cost_multiplier: 1.5,
        effect_per_level: 100.0,
        max_level: None,
    },
    UpgradeDef {
        id: "health_boost_3",
        name: "Extra Life III",
        category: UpgradeCategory::HealthMax,
        base_cost: 800.0,
        cost_multiplier: 1.5,
        effect_per_level: 200.0,
        max_level: None,
    },
    // Click power
    UpgradeDef {
        id: "sharper_claws",
        name: "Sharper Claws",
        category: UpgradeCategory::ClickPower,
        base_cost: 25.0,
        cost_multiplier: 1.3,
        effect_per_level: 1.0,
        max_level: None,
    },
];

pub static ATTACKS: &[AttackDef] = &[
    // Instant
    AttackDef {
        id: "quick_scratch",
        name: "Quick Scratch",
        kind: AttackKind::Instant,
        damage: 10.0,
        food_cost: 5.0,
    },
    AttackDef {
        id: "feline_bite",
        name: "Feline Bite",
        kind: AttackKind::Instant,
        damage: 25.0,
        food_cost: 15.0,
    },
    AttackDef {
        id: "wild_swipe",
        name: "Wild Swipe",
        kind: AttackKind::Instant,
        damage: 50.0,
        food_cost: 35.0,
    },
    AttackDef {
        id: "acrobatic_leap",
        name: "Acrobatic Leap",
        kind: AttackKind::Instant,
        damage: 100.0,
        food_cost: 75.0,
    },
    AttackDef {
        id: "cat_fury",
        name: "Cat Fury",
        kind: AttackKind::Instant,
        damage: 200.0,
        food_cost: 150.0,
    },
    AttackDef {
        id: "mega_pounce",
        name: "Mega Pounce",
        kind: AttackKind::Instant,
        damage: 500.0,
        food_cost: 400.0,
    },
    // Passive (damage per second)
    AttackDef {
        id: "intimidating_stare",
        name: "Intimidating Stare",
        kind: AttackKind::Passive,
        damage: 1.0,
        food_cost: 20.0,
    },
    AttackDef {
        id: "deafening_purr",
        name: "Deafening Purr",
        kind: AttackKind::Passive,
        damage: 3.0,
        food_cost: 60.0,
    },
    AttackDef {
        id: "poison_hairball",
        name: "Poison Hairball",
        kind: AttackKind::Passive,
        damage: 8.0,
        food_cost: 180.0,
    },
    AttackDef {
        id: "cursed_meow",
        name: "Cursed Meow",
        kind: AttackKind::Passive,
        damage: 20.0,
        food_cost: 500.0,
    },
];

pub static ITEMS: &[ItemDef] = &[
    // Single-use
    ItemDef {
        id: "tuna_can",
        name: "Tuna Can",
        cost: Cost {
            currency: Currency::Money,
            amount: 150.0,
        },
        effect: ItemEffect::InstantEnergy(500.0),
        stackable: false,
    },
    ItemDef {
        id: "catnip",
        name: "Catnip",
        cost: Cost {
            currency: Currency::Food,
            amount: 30.0,
        },
        effect: ItemEffect::ClickMultiplier(2.0),
        stackable: false,
    },
    ItemDef {
        id: "fish_feast",
        name: "Fish Feast",
        cost: Cost {
            currency: Currency::Food,
            amount: 50.0,
        },
        effect: ItemEffect::InstantMoney(1000.0),
        stackable: false,
    },
    ItemDef {
        id: "healing_treat",
        name: "Healing Treat",
        cost: Cost {
            currency: Currency::Money,
            amount: 200.0,
        },
        effect: ItemEffect::InstantHealth(500.0),
        stackable: false,
    },
    // Stackable
    ItemDef {
        id: "gold_collar",
        name: "Gold Collar",
        cost: Cost {
            currency: Currency::Money,
            amount: 500.0,
        },
        effect: ItemEffect::MoneyPerSecond(5.0),
        stackable: true,
    },
    ItemDef {
        id: "energy_crystal",
        name: "Energy Crystal",
        cost: Cost {
            currency: Currency::Money,
            amount: 400.0,
        },
        effect: ItemEffect::EnergyPerSecond(2.0),
        stackable: true,
    },
    ItemDef {
        id: "cursed_bell",
        name: "Cursed Bell",
        cost: Cost {
            currency: Currency::Food,
            amount: 100.0,
        },
        effect: ItemEffect::DamagePerSecond(1.0),
        stackable: true,
    },
];

pub static ENERGY_CHOICES: &[ChoiceDef] = &[
    ChoiceDef {
        id: "damage_enemy",
        name: "Ultimate Swipe",
        effect: ChoiceEffect::InstantDamage(100.0),
    },
    ChoiceDef {
        id: "heal_self",
        name: "Lick Your Wounds",
        effect: ChoiceEffect::InstantHeal(200.0),
    },
    ChoiceDef {
        id: "boost_earnings",
        name: "Feline Fury",
        effect: ChoiceEffect::PermanentModifier {
            earnings: Some(1.15),
            passive_earnings: None,
            damage: Some(1.10),
        },
    },
    ChoiceDef {
        id: "defensive_stance",
        name: "Defensive Stance",
        effect: ChoiceEffect::PermanentModifier {
            earnings: None,
            passive_earnings: Some(0.90),
            damage: Some(0.95),
        },
    },
];
