//! The authoritative match state machine.
//!
//! A [`Room`] owns the state of exactly one two-participant match. Every
//! operation validates its preconditions first and mutates nothing on
//! failure; outbound events flow through the sink injected at
//! construction, so the room never touches a transport. The caller (the
//! room actor) is responsible for serializing calls — `Room` itself is
//! plain synchronous code.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use catclash_catalog::{self as catalog, AttackKind, ChoiceEffect, Currency, ItemDef, ItemEffect, UpgradeCategory};
use catclash_protocol::{GameSnapshot, Modifiers, PlayerId, PlayerState, Recipient, RoomId, ServerEvent};

use crate::{GameConfig, Phase, RoomError};

/// One event emitted by the room, not yet resolved to connections.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub to: Recipient,
    pub event: ServerEvent,
}

/// Broadcast callback injected into a [`Room`] at construction.
pub type EventSink = Box<dyn FnMut(Outbound) + Send>;

/// A gameplay intent from one participant.
///
/// `Ready` is legal while the room is Waiting; everything else requires
/// the match to be Active.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerAction {
    Ready,
    Click,
    BuyFood { amount: u32 },
    BuyUpgrade { upgrade_id: String },
    BuyAttack { attack_id: String },
    BuyItem { item_id: String },
    UseItem { item_id: String },
    EnergyChoice { choice_id: String },
}

/// The authoritative state of one match.
pub struct Room {
    id: RoomId,
    config: GameConfig,
    phase: Phase,
    /// Participants in ascending join order. The tick and the win scan
    /// iterate this order, which makes both deterministic.
    players: Vec<PlayerState>,
    winner: Option<PlayerId>,
    sink: EventSink,
}

impl Room {
    pub fn new(id: RoomId, config: GameConfig, sink: EventSink) -> Self {
        Self {
            id,
            config,
            phase: Phase::Waiting,
            players: Vec::with_capacity(2),
            winner: None,
            sink,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Full wire snapshot of the room.
    pub fn snapshot(&self) -> GameSnapshot {
        let players: BTreeMap<PlayerId, PlayerState> = self
            .players
            .iter()
            .map(|p| (p.id, p.clone()))
            .collect();
        GameSnapshot {
            room_id: self.id,
            game_started: self.phase != Phase::Waiting,
            game_ended: self.phase == Phase::Ended,
            winner: self.winner,
            players,
        }
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Seats a participant. Fails once both seats are taken or after the
    /// match has started.
    pub fn join(&mut self, id: PlayerId, name: impl Into<String>) -> Result<(), RoomError> {
        if self.phase != Phase::Waiting {
            return Err(RoomError::MatchStarted);
        }
        if self.players.iter().any(|p| p.id == id) {
            return Err(RoomError::AlreadySeated(id));
        }
        if self.players.len() >= 2 {
            return Err(RoomError::RoomFull(self.id));
        }

        self.players.push(initial_player(id, name.into(), &self.config));
        tracing::info!(
            room_id = %self.id,
            player_id = %id,
            players = self.players.len(),
            "player joined"
        );
        self.broadcast_state();
        Ok(())
    }

    /// Removes a participant. If the match was running it ends immediately
    /// with the survivor (if any) as winner. Returns the remaining seat
    /// count so the caller can destroy an empty room.
    pub fn leave(&mut self, id: PlayerId) -> Result<usize, RoomError> {
        let idx = self.index_of(id)?;
        self.players.remove(idx);
        tracing::info!(
            room_id = %self.id,
            player_id = %id,
            players = self.players.len(),
            "player left"
        );

        if self.phase == Phase::Active {
            match self.players.first().map(|p| p.id) {
                Some(survivor) => self.end(survivor),
                // Both seats emptied at once; nobody left to crown.
                None => self.phase = Phase::Ended,
            }
        }
        Ok(self.players.len())
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Validates and applies one intent. Failure mutates nothing.
    pub fn apply(&mut self, id: PlayerId, action: PlayerAction) -> Result<(), RoomError> {
        let idx = self.index_of(id)?;

        if let PlayerAction::Ready = action {
            return self.set_ready(idx);
        }

        match self.phase {
            Phase::Waiting => return Err(RoomError::MatchNotStarted),
            Phase::Ended => return Err(RoomError::MatchOver),
            Phase::Active => {}
        }

        match action {
            PlayerAction::Ready => unreachable!("handled above"),
            PlayerAction::Click => self.click(idx),
            PlayerAction::BuyFood { amount } => self.buy_food(idx, amount),
            PlayerAction::BuyUpgrade { upgrade_id } => self.buy_upgrade(idx, &upgrade_id),
            PlayerAction::BuyAttack { attack_id } => self.buy_attack(idx, &attack_id),
            PlayerAction::BuyItem { item_id } => self.buy_item(idx, &item_id),
            PlayerAction::UseItem { item_id } => self.use_item(idx, &item_id),
            PlayerAction::EnergyChoice { choice_id } => self.energy_choice(idx, &choice_id),
        }
    }

    /// Ready is idempotent: a second declaration is a silent success in
    /// any phase.
    fn set_ready(&mut self, idx: usize) -> Result<(), RoomError> {
        if self.players[idx].ready {
            return Ok(());
        }
        if self.phase != Phase::Waiting {
            return Err(RoomError::MatchStarted);
        }

        self.players[idx].ready = true;
        self.broadcast_state();

        if self.players.len() == 2 && self.players.iter().all(|p| p.ready) {
            self.start();
        }
        Ok(())
    }

    fn start(&mut self) {
        self.phase = Phase::Active;
        tracing::info!(room_id = %self.id, "match started");
        self.broadcast_state();
        self.emit(Recipient::All, ServerEvent::GameStart {});
    }

    fn click(&mut self, idx: usize) -> Result<(), RoomError> {
        let p = &mut self.players[idx];
        p.money += p.click_power * p.modifiers.earnings_multiplier;
        self.emit_player_update(idx);
        Ok(())
    }

    fn buy_food(&mut self, idx: usize, amount: u32) -> Result<(), RoomError> {
        let cost = f64::from(amount) * self.config.energy_per_food;
        let p = &mut self.players[idx];
        if p.energy < cost {
            return Err(RoomError::InsufficientEnergy);
        }
        p.energy -= cost;
        p.food += f64::from(amount);
        self.emit_player_update(idx);
        Ok(())
    }

    fn buy_upgrade(&mut self, idx: usize, upgrade_id: &str) -> Result<(), RoomError> {
        let def = catalog::upgrade(upgrade_id)
            .ok_or_else(|| RoomError::UnknownUpgrade(upgrade_id.to_string()))?;

        let p = &mut self.players[idx];
        let level = p.upgrades.get(upgrade_id).copied().unwrap_or(0);
        if def.max_level.is_some_and(|max| level >= max) {
            return Err(RoomError::MaxLevel(upgrade_id.to_string()));
        }
        let cost = def.cost_at(level);
        if p.money < cost {
            return Err(RoomError::InsufficientMoney);
        }

        p.money -= cost;
        p.upgrades.insert(upgrade_id.to_string(), level + 1);
        match def.category {
            UpgradeCategory::MoneyPassive => p.money_per_second += def.effect_per_level,
            UpgradeCategory::EnergyPassive => p.energy_per_second += def.effect_per_level,
            UpgradeCategory::HealthMax => {
                p.max_health += def.effect_per_level;
                p.health += def.effect_per_level;
            }
            UpgradeCategory::ClickPower => p.click_power += def.effect_per_level,
        }
        self.emit_player_update(idx);
        Ok(())
    }

    fn buy_attack(&mut self, idx: usize, attack_id: &str) -> Result<(), RoomError> {
        let def = catalog::attack(attack_id)
            .ok_or_else(|| RoomError::UnknownAttack(attack_id.to_string()))?;
        let opp = self.opponent_index(idx).ok_or(RoomError::NoOpponent)?;
        if self.players[idx].food < def.food_cost {
            return Err(RoomError::InsufficientFood);
        }

        self.players[idx].food -= def.food_cost;
        match def.kind {
            AttackKind::Instant => {
                let dealt = self.damage_player(opp, def.damage);
                let victim = self.players[opp].id;
                self.emit(
                    Recipient::Player(victim),
                    ServerEvent::AttackReceived {
                        attack_name: def.name.to_string(),
                        damage: dealt,
                    },
                );
            }
            AttackKind::Passive => self.players[idx].damage_per_second += def.damage,
        }

        self.emit_player_update(idx);
        self.emit_player_update(opp);
        self.check_win();
        Ok(())
    }

    fn buy_item(&mut self, idx: usize, item_id: &str) -> Result<(), RoomError> {
        let def = catalog::item(item_id)
            .ok_or_else(|| RoomError::UnknownItem(item_id.to_string()))?;

        let p = &mut self.players[idx];
        match def.cost.currency {
            Currency::Money => {
                if p.money < def.cost.amount {
                    return Err(RoomError::InsufficientMoney);
                }
                p.money -= def.cost.amount;
            }
            Currency::Food => {
                if p.food < def.cost.amount {
                    return Err(RoomError::InsufficientFood);
                }
                p.food -= def.cost.amount;
            }
        }

        if def.stackable {
            *p.items.entry(def.id.to_string()).or_insert(0) += 1;
            self.emit_player_update(idx);
        } else {
            // Single-use items don't enter the inventory at all.
            self.apply_item_effect(idx, def);
        }
        Ok(())
    }

    fn use_item(&mut self, idx: usize, item_id: &str) -> Result<(), RoomError> {
        let def = catalog::item(item_id)
            .ok_or_else(|| RoomError::UnknownItem(item_id.to_string()))?;

        let p = &mut self.players[idx];
        let count = p
            .items
            .get_mut(item_id)
            .ok_or_else(|| RoomError::ItemNotOwned(item_id.to_string()))?;
        *count -= 1;
        if *count == 0 {
            p.items.remove(item_id);
        }

        self.apply_item_effect(idx, def);
        Ok(())
    }

    /// Applies an item effect and emits the resulting updates. The user
    /// always gets an update; the opponent gets one only when the effect
    /// targeted them.
    fn apply_item_effect(&mut self, idx: usize, def: &'static ItemDef) {
        let mut hit_opponent = false;
        match def.effect {
            ItemEffect::InstantMoney(v) => self.players[idx].money += v,
            ItemEffect::InstantEnergy(v) => {
                let cap = self.config.energy_cap;
                let p = &mut self.players[idx];
                p.energy = (p.energy + v).min(cap);
            }
            ItemEffect::InstantHealth(v) => {
                let p = &mut self.players[idx];
                p.health = (p.health + v).min(p.max_health);
            }
            ItemEffect::InstantDamage(v) => {
                if let Some(opp) = self.opponent_index(idx) {
                    let dealt = self.damage_player(opp, v);
                    let victim = self.players[opp].id;
                    self.emit(
                        Recipient::Player(victim),
                        ServerEvent::AttackReceived {
                            attack_name: def.name.to_string(),
                            damage: dealt,
                        },
                    );
                    hit_opponent = true;
                }
            }
            ItemEffect::MoneyPerSecond(v) => self.players[idx].money_per_second += v,
            ItemEffect::EnergyPerSecond(v) => self.players[idx].energy_per_second += v,
            ItemEffect::DamagePerSecond(v) => self.players[idx].damage_per_second += v,
            ItemEffect::ClickMultiplier(m) => self.players[idx].click_power *= m,
        }

        self.emit_player_update(idx);
        if hit_opponent {
            if let Some(opp) = self.opponent_index(idx) {
                self.emit_player_update(opp);
            }
            self.check_win();
        }
    }

    fn energy_choice(&mut self, idx: usize, choice_id: &str) -> Result<(), RoomError> {
        // Resolve the choice before consuming anything: an unknown id must
        // leave the banked energy untouched.
        let def = catalog::energy_choice(choice_id)
            .ok_or_else(|| RoomError::UnknownChoice(choice_id.to_string()))?;
        if self.players[idx].energy < self.config.energy_cap {
            return Err(RoomError::EnergyBelowThreshold);
        }

        // Whichever branch runs, the banked energy is spent.
        self.players[idx].energy = 0.0;

        match def.effect {
            ChoiceEffect::InstantDamage(v) => {
                if let Some(opp) = self.opponent_index(idx) {
                    let dealt = self.damage_player(opp, v);
                    let victim = self.players[opp].id;
                    self.emit(
                        Recipient::Player(victim),
                        ServerEvent::AttackReceived {
                            attack_name: def.name.to_string(),
                            damage: dealt,
                        },
                    );
                }
            }
            ChoiceEffect::InstantHeal(v) => {
                let p = &mut self.players[idx];
                p.health = (p.health + v).min(p.max_health);
            }
            ChoiceEffect::PermanentModifier {
                earnings,
                passive_earnings,
                damage,
            } => {
                let m = &mut self.players[idx].modifiers;
                if let Some(f) = earnings {
                    m.earnings_multiplier *= f;
                }
                if let Some(f) = passive_earnings {
                    m.passive_earnings_multiplier *= f;
                }
                if let Some(f) = damage {
                    m.damage_multiplier *= f;
                }
            }
        }

        self.emit_player_update(idx);
        if let Some(opp) = self.opponent_index(idx) {
            self.emit_player_update(opp);
        }
        self.check_win();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// One fixed-period simulation step. A no-op outside Active, so a
    /// straggling timer fire after the match ends is harmless.
    pub fn tick(&mut self) {
        if self.phase != Phase::Active {
            return;
        }

        for idx in 0..self.players.len() {
            let cap = self.config.energy_cap;
            let p = &mut self.players[idx];

            let money_gain = p.money_per_second
                * p.modifiers.earnings_multiplier
                * p.modifiers.passive_earnings_multiplier;
            p.money += money_gain;

            let energy_gain = p.energy_per_second * p.modifiers.earnings_multiplier;
            let before = p.energy;
            p.energy = (p.energy + energy_gain).min(cap);

            let crossed_cap = before < cap && p.energy >= cap;
            let owner = p.id;
            let dps = p.damage_per_second;

            if crossed_cap {
                self.emit(Recipient::Player(owner), ServerEvent::EnergyThresholdReached {});
            }

            if dps > 0.0 {
                if let Some(opp) = self.opponent_index(idx) {
                    self.damage_player(opp, dps);
                }
            }
        }

        self.check_win();
        self.emit(
            Recipient::All,
            ServerEvent::GameTick {
                timestamp: unix_millis(),
            },
        );
        for idx in 0..self.players.len() {
            self.emit_player_update(idx);
        }
    }

    // -----------------------------------------------------------------------
    // Win condition
    // -----------------------------------------------------------------------

    /// Evaluates the win condition at most once per match.
    ///
    /// Players are scanned in join order and the first one found at zero
    /// health loses; in a simultaneous double knockout the earlier joiner
    /// therefore loses. The Active-phase guard makes `game:end`
    /// exactly-once no matter how many damage sources fire.
    fn check_win(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        if let Some(idx) = self.players.iter().position(|p| p.health <= 0.0) {
            if let Some(opp) = self.opponent_index(idx) {
                let winner = self.players[opp].id;
                self.end(winner);
            }
        }
    }

    fn end(&mut self, winner_id: PlayerId) {
        self.phase = Phase::Ended;
        self.winner = Some(winner_id);
        let winner_name = self
            .players
            .iter()
            .find(|p| p.id == winner_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        tracing::info!(room_id = %self.id, %winner_id, "match ended");
        self.emit(
            Recipient::All,
            ServerEvent::GameEnd {
                winner_id,
                winner_name,
            },
        );
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn index_of(&self, id: PlayerId) -> Result<usize, RoomError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(RoomError::UnknownPlayer(id))
    }

    fn opponent_index(&self, idx: usize) -> Option<usize> {
        match self.players.len() {
            2 => Some(1 - idx),
            _ => None,
        }
    }

    /// Applies raw damage to a player, scaled by their own damage
    /// multiplier and floored at zero. Returns the damage dealt.
    fn damage_player(&mut self, idx: usize, raw: f64) -> f64 {
        let p = &mut self.players[idx];
        let dealt = raw * p.modifiers.damage_multiplier;
        p.health = (p.health - dealt).max(0.0);
        dealt
    }

    fn emit(&mut self, to: Recipient, event: ServerEvent) {
        (self.sink)(Outbound { to, event });
    }

    fn broadcast_state(&mut self) {
        let snapshot = self.snapshot();
        self.emit(Recipient::All, ServerEvent::RoomState { game_state: snapshot });
    }

    /// The targeted update pair: the participant's state to everyone, plus
    /// the mirror addressed to the other side as an opponent update.
    fn emit_player_update(&mut self, idx: usize) {
        let player = self.players[idx].clone();
        let player_id = player.id;
        self.emit(
            Recipient::All,
            ServerEvent::PlayerUpdate {
                player_id,
                player: player.clone(),
            },
        );
        self.emit(
            Recipient::AllExcept(player_id),
            ServerEvent::EnemyUpdate { player_id, player },
        );
    }
}

fn initial_player(id: PlayerId, name: String, config: &GameConfig) -> PlayerState {
    PlayerState {
        id,
        name,
        ready: false,
        health: config.initial_health,
        max_health: config.initial_health,
        money: config.initial_money,
        energy: config.initial_energy,
        food: config.initial_food,
        money_per_second: config.base_money_per_second,
        energy_per_second: config.base_energy_per_second,
        damage_per_second: 0.0,
        click_power: config.initial_click_power,
        modifiers: Modifiers::default(),
        upgrades: BTreeMap::new(),
        items: BTreeMap::new(),
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// =========================================================================
// Tests
// =========================================================================
