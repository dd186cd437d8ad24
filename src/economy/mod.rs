//! Earth Tycoon economy engine.
//!
//! [`Engine`] owns the game state, the timers and the save slot. Every
//! command first fires the timers that came due since the last call, then
//! applies its rule from [`logic`], announces the change to observers and
//! persists. Timer firings do the same, so observers and storage always see
//! the live state.

pub mod catalog;
pub mod events;
pub mod logic;
pub mod save;
pub mod scheduler;
pub mod state;
pub mod view;

mod simulator;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{AbilityError, BuildError, DemolishError, PurchaseError, UpgradeError};
use crate::time::Clock;

use catalog::{AbilityKind, BuildingType, RegionCategory};
use events::{EngineEvent, Observer, Observers, SubscriptionId};
use logic::{AreaPurchase, Breadcrumb, CooldownInfo, Unlocks, Upgrade};
use save::BlobStore;
use scheduler::{Scheduler, TimerKey};
use state::{Building, EngineState, Region, BASE_INCOME_PER_CLICK};

pub struct Engine {
    state: EngineState,
    config: EngineConfig,
    store: Box<dyn BlobStore>,
    clock: Box<dyn Clock>,
    scheduler: Scheduler,
    observers: Observers,
    loading: bool,
    disposed: bool,
}

impl Engine {
    /// A fresh engine on the default state. Call [`Engine::init`] to restore
    /// the saved game and start the timers.
    pub fn new(config: EngineConfig, store: Box<dyn BlobStore>, clock: Box<dyn Clock>) -> Self {
        let scheduler = Scheduler::new(config.timing.max_catch_up);
        Self {
            state: EngineState::new(),
            config,
            store,
            clock,
            scheduler,
            observers: Observers::new(),
            loading: true,
            disposed: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────

    /// Restore the saved game (or start fresh) and arm the timers.
    pub fn init(&mut self) {
        let now = self.clock.now_ms();
        let key = self.config.storage_key.clone();

        match self.store.load(&key) {
            Ok(Some(blob)) => match save::decode(&blob) {
                Ok(state) => {
                    info!(
                        currency = state.currency,
                        area = state.total_area_owned,
                        buildings = state.building_count(),
                        "save loaded"
                    );
                    self.state = state;
                }
                Err(e) => {
                    warn!(error = %e, "discarding unreadable save");
                    if let Err(e) = self.store.remove(&key) {
                        warn!(error = %e, "failed to remove unreadable save");
                    }
                    self.state = EngineState::new();
                }
            },
            Ok(None) => {
                info!("no save found, starting a new game");
                self.state = EngineState::new();
            }
            Err(e) => {
                warn!(error = %e, "failed to read save, starting a new game");
                self.state = EngineState::new();
            }
        }

        self.scheduler.cancel_all();
        self.reconcile_abilities(now);
        self.sync_passive_timer(now);
        self.arm_autosave(now);
        self.loading = false;
        self.disposed = false;
        self.notify(EngineEvent::Loaded);
    }

    /// Fire every timer due by now.
    pub fn advance(&mut self) {
        self.pump();
    }

    /// Cancel all timers and write the final state.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.pump();
        self.scheduler.cancel_all();
        self.persist();
        self.disposed = true;
        info!("engine disposed");
    }

    // ── Commands ──────────────────────────────────────────

    /// Tap the planet once. Returns the Earons earned.
    pub fn tap(&mut self) -> f64 {
        let now = self.pump();
        let value = self.tap_once(now);
        self.persist();
        value
    }

    pub fn purchase_area(&mut self, amount: u64) -> Result<AreaPurchase, PurchaseError> {
        let now = self.pump();
        let result = logic::purchase_area(&mut self.state, amount);
        self.after_purchase(now, result)
    }

    /// Buy the selected batch; the selection resets to 1 on success.
    pub fn purchase_selected_area(&mut self) -> Result<AreaPurchase, PurchaseError> {
        let now = self.pump();
        let result = logic::purchase_selected_area(&mut self.state);
        self.after_purchase(now, result)
    }

    pub fn set_area_purchase_amount(&mut self, amount: u64) {
        self.pump();
        logic::set_area_purchase_amount(&mut self.state, amount);
        debug!(amount = self.state.area_purchase_amount, "purchase amount selected");
        self.notify(EngineEvent::AreaSelectionChanged {
            amount: self.state.area_purchase_amount,
        });
        self.persist();
    }

    pub fn build_building(&mut self, region_id: u32, kind: BuildingType) -> Result<String, BuildError> {
        let now = self.pump();
        match logic::build_building(&mut self.state, region_id, kind, now) {
            Ok(id) => {
                debug!(%id, region_id, kind = kind.key(), "building built");
                self.sync_passive_timer(now);
                self.notify(EngineEvent::BuildingBuilt { id: id.clone() });
                self.persist();
                Ok(id)
            }
            Err(e) => {
                debug!(reason = e.reason(), region_id, kind = kind.key(), "build rejected");
                Err(e)
            }
        }
    }

    pub fn upgrade_building(&mut self, id: &str) -> Result<Upgrade, UpgradeError> {
        self.pump();
        match logic::upgrade_building(&mut self.state, id) {
            Ok(up) => {
                debug!(id, level = up.new_level, cost = up.cost, "building upgraded");
                self.notify(EngineEvent::BuildingUpgraded {
                    id: id.to_string(),
                    level: up.new_level,
                });
                self.persist();
                Ok(up)
            }
            Err(e) => {
                debug!(reason = e.reason(), id, "upgrade rejected");
                Err(e)
            }
        }
    }

    /// Returns the refund.
    pub fn demolish_building(&mut self, id: &str) -> Result<f64, DemolishError> {
        let now = self.pump();
        match logic::demolish_building(&mut self.state, id) {
            Ok(refund) => {
                debug!(id, refund, "building demolished");
                self.sync_passive_timer(now);
                self.notify(EngineEvent::BuildingDemolished {
                    id: id.to_string(),
                    refund,
                });
                self.persist();
                Ok(refund)
            }
            Err(e) => {
                debug!(reason = e.reason(), id, "demolish rejected");
                Err(e)
            }
        }
    }

    pub fn activate_ability(&mut self, kind: AbilityKind) -> Result<(), AbilityError> {
        let now = self.pump();
        if let Err(e) =
            logic::activate_ability(&mut self.state, kind, now, self.config.timing.ability_cooldown_ms)
        {
            debug!(reason = e.reason(), ability = kind.key(), "activation rejected");
            return Err(e);
        }
        info!(ability = kind.key(), duration_secs = kind.duration_secs(), "ability activated");
        self.arm_ability(kind, now, now.saturating_add(kind.duration_ms()));
        self.notify(EngineEvent::AbilityActivated(kind));
        self.persist();
        Ok(())
    }

    /// Back to a brand-new game. Pending timers are dropped and the save is
    /// removed.
    pub fn reset_game(&mut self) {
        let now = self.clock.now_ms();
        self.scheduler.cancel_all();
        self.state = EngineState::new();
        if !self.disposed {
            if let Err(e) = self.store.remove(&self.config.storage_key) {
                warn!(error = %e, "failed to remove save during reset");
            }
        }
        info!("game reset");
        self.notify(EngineEvent::Reset);
        if !self.disposed {
            self.arm_autosave(now);
        }
    }

    /// Write the state now. Returns false if the store rejected it.
    pub fn save_now(&mut self) -> bool {
        self.pump();
        let saved = self.persist();
        if saved {
            self.notify(EngineEvent::Saved);
        }
        saved
    }

    // ── Subscriptions ─────────────────────────────────────

    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ── Queries ───────────────────────────────────────────

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn max_affordable_area(&self) -> u64 {
        logic::max_affordable_area(&self.state)
    }

    pub fn projected_area_cost(&self, amount: u64) -> f64 {
        logic::projected_area_cost(&self.state, amount)
    }

    pub fn selected_area_cost(&self) -> f64 {
        logic::selected_area_cost(&self.state)
    }

    pub fn building_income(&self, building: &Building) -> f64 {
        self.state.building_income(building)
    }

    pub fn total_building_income(&self) -> f64 {
        self.state.total_building_income()
    }

    pub fn total_click_bonus_percent(&self) -> f64 {
        self.state.total_click_bonus_percent()
    }

    pub fn total_passive_income(&self) -> f64 {
        self.state.total_passive_income()
    }

    pub fn regional_bonus(&self, kind: BuildingType, category: RegionCategory) -> f64 {
        catalog::regional_bonus(kind, category)
    }

    /// The region the owned area currently reaches.
    pub fn current_region(&self) -> Option<&Region> {
        self.state.region(logic::current_region_index(&self.state))
    }

    pub fn region_breadcrumb(&self) -> Breadcrumb {
        logic::region_breadcrumb(&self.state)
    }

    pub fn ability_cooldown_info(&self, kind: AbilityKind) -> CooldownInfo {
        logic::ability_cooldown_info(
            &self.state,
            kind,
            self.clock.now_ms(),
            self.config.timing.ability_cooldown_ms,
        )
    }

    pub fn is_timer_scheduled(&self, key: TimerKey) -> bool {
        self.scheduler.is_scheduled(key)
    }

    /// When the next timer fires, if any is pending.
    pub fn next_timer_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    // ── Internals ─────────────────────────────────────────

    /// Fire all due timers in due order. Returns the current time.
    fn pump(&mut self) -> u64 {
        let now = self.clock.now_ms();
        if self.disposed {
            return now;
        }
        while let Some((key, due_at)) = self.scheduler.pop_due(now) {
            self.fire(key, due_at, now);
        }
        now
    }

    fn fire(&mut self, key: TimerKey, due_at: u64, now: u64) {
        match key {
            TimerKey::PassiveIncome => {
                if !self.state.has_income_sources() {
                    self.scheduler.cancel(TimerKey::PassiveIncome);
                    return;
                }
                let amount = logic::passive_income_tick(&mut self.state);
                debug!(amount, due_at, "passive income");
                self.notify(EngineEvent::PassiveIncome { amount });
                self.persist();
            }
            TimerKey::AutoSave => {
                debug!(due_at, "autosave");
                self.persist();
            }
            TimerKey::AbilityExpiry(kind) => {
                self.expire(kind);
                self.persist();
            }
            TimerKey::ContinuousTap => {
                if !self.state.is_active(AbilityKind::ContinuousTapping) {
                    self.scheduler.cancel(TimerKey::ContinuousTap);
                    return;
                }
                self.tap_once(now);
                self.persist();
            }
        }
    }

    fn tap_once(&mut self, now: u64) -> f64 {
        let steal_base = if self.config.rules.steal_uses_standard_click_base {
            BASE_INCOME_PER_CLICK
        } else {
            logic::STEAL_CLICK_BASE
        };
        let outcome = logic::tap(&mut self.state, steal_base);
        if outcome.stole_area {
            self.sync_passive_timer(now);
        }
        self.notify(EngineEvent::Tapped {
            value: outcome.value,
        });
        self.announce_unlocks(outcome.unlocks);
        outcome.value
    }

    fn after_purchase(
        &mut self,
        now: u64,
        result: Result<AreaPurchase, PurchaseError>,
    ) -> Result<AreaPurchase, PurchaseError> {
        match result {
            Ok(receipt) => {
                debug!(amount = receipt.amount, cost = receipt.cost, "area purchased");
                self.sync_passive_timer(now);
                self.notify(EngineEvent::AreaPurchased {
                    amount: receipt.amount,
                    cost: receipt.cost,
                });
                self.announce_unlocks(receipt.unlocks.clone());
                self.persist();
                Ok(receipt)
            }
            Err(e) => {
                debug!(reason = e.reason(), "area purchase rejected");
                Err(e)
            }
        }
    }

    fn announce_unlocks(&mut self, unlocks: Unlocks) {
        for id in unlocks.regions {
            info!(region_id = id, "region unlocked");
            self.notify(EngineEvent::RegionUnlocked(id));
        }
        for kind in unlocks.abilities {
            info!(ability = kind.key(), "ability unlocked");
            self.notify(EngineEvent::AbilityUnlocked(kind));
        }
    }

    fn expire(&mut self, kind: AbilityKind) {
        self.scheduler.cancel(TimerKey::AbilityExpiry(kind));
        if kind == AbilityKind::ContinuousTapping {
            self.scheduler.cancel(TimerKey::ContinuousTap);
        }
        if logic::expire_ability(&mut self.state, kind) {
            info!(ability = kind.key(), "ability expired");
            self.notify(EngineEvent::AbilityExpired(kind));
        }
    }

    /// Arm the expiry (and pulse) timers of an ability active until `until`.
    fn arm_ability(&mut self, kind: AbilityKind, now: u64, until: u64) {
        if self.disposed {
            return;
        }
        self.scheduler.schedule_once(TimerKey::AbilityExpiry(kind), until);
        if kind == AbilityKind::ContinuousTapping {
            self.scheduler.schedule_every(
                TimerKey::ContinuousTap,
                now,
                self.config.timing.continuous_tap_interval_ms,
            );
        }
    }

    /// Abilities saved mid-window either expire now or resume their timers.
    fn reconcile_abilities(&mut self, now: u64) {
        for &kind in AbilityKind::all() {
            let ability = self.state.ability(kind);
            if !ability.active {
                continue;
            }
            match ability.active_until() {
                Some(until) if now < until => {
                    debug!(ability = kind.key(), remaining_ms = until - now, "resuming ability");
                    self.arm_ability(kind, now, until);
                }
                _ => {
                    logic::expire_ability(&mut self.state, kind);
                    debug!(ability = kind.key(), "saved ability window already over");
                }
            }
        }
    }

    /// Passive income runs only while something pays out. An armed timer
    /// keeps its phase.
    fn sync_passive_timer(&mut self, now: u64) {
        if self.disposed {
            return;
        }
        if self.state.has_income_sources() {
            self.scheduler.ensure_every(
                TimerKey::PassiveIncome,
                now,
                self.config.timing.passive_income_interval_ms,
            );
        } else {
            self.scheduler.cancel(TimerKey::PassiveIncome);
        }
    }

    fn arm_autosave(&mut self, now: u64) {
        self.scheduler
            .schedule_every(TimerKey::AutoSave, now, self.config.timing.autosave_interval_ms);
    }

    /// Write the state to the store. Failures are logged, never raised.
    /// Nothing is written before `init` or after `dispose`.
    fn persist(&mut self) -> bool {
        if self.loading || self.disposed {
            return false;
        }
        let blob = match save::encode(&self.state) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to serialize save");
                return false;
            }
        };
        match self.store.save(&self.config.storage_key, &blob) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to write save");
                false
            }
        }
    }

    fn notify(&mut self, event: EngineEvent) {
        self.observers.notify(&event, &self.state);
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("loading", &self.loading)
            .field("disposed", &self.disposed)
            .field("timers", &self.scheduler.len())
            .field("observers", &self.observers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::save::MemoryStore;
    use crate::time::ManualClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    const START: u64 = 1_700_000_000_000;

    fn engine() -> (Engine, ManualClock, MemoryStore) {
        let clock = ManualClock::new(START);
        let store = MemoryStore::new();
        let mut e = Engine::new(
            EngineConfig::default(),
            Box::new(store.clone()),
            Box::new(clock.clone()),
        );
        e.init();
        (e, clock, store)
    }

    #[test]
    fn new_engine_is_loading_until_init() {
        let e = Engine::new(
            EngineConfig::default(),
            Box::new(MemoryStore::new()),
            Box::new(ManualClock::new(0)),
        );
        assert!(e.is_loading());
        let (e, _, _) = engine();
        assert!(!e.is_loading());
    }

    #[test]
    fn commands_before_init_are_not_persisted() {
        let store = MemoryStore::new();
        let mut e = Engine::new(
            EngineConfig::default(),
            Box::new(store.clone()),
            Box::new(ManualClock::new(0)),
        );
        e.tap();
        assert!(store.get("earthGameState").is_none());
    }

    #[test]
    fn tap_persists() {
        let (mut e, _, store) = engine();
        e.tap();
        let blob = store.get("earthGameState").unwrap();
        assert!((save::decode(&blob).unwrap().currency - 100.0).abs() < 0.001);
    }

    #[test]
    fn passive_timer_follows_income_sources() {
        let (mut e, clock, _) = engine();
        assert!(!e.is_timer_scheduled(TimerKey::PassiveIncome));
        e.tap();
        e.purchase_area(10).unwrap();
        assert!(e.is_timer_scheduled(TimerKey::PassiveIncome));
        let before = e.state().currency;
        clock.advance(1_000);
        e.advance();
        assert!((e.state().currency - before - 0.1).abs() < 1e-9);
    }

    #[test]
    fn passive_timer_cancelled_when_last_building_removed() {
        let (mut e, _, _) = engine();
        for _ in 0..2 {
            e.tap();
        }
        let id = e.build_building(1, BuildingType::SolarPanel).unwrap();
        assert!(e.is_timer_scheduled(TimerKey::PassiveIncome));
        e.demolish_building(&id).unwrap();
        assert!(!e.is_timer_scheduled(TimerKey::PassiveIncome));
    }

    #[test]
    fn ability_expires_on_timer() {
        let (mut e, clock, _) = engine();
        e.tap();
        e.purchase_area(100).unwrap();
        e.activate_ability(AbilityKind::TapMultiplier).unwrap();
        clock.advance(29_999);
        e.advance();
        assert!(e.state().is_active(AbilityKind::TapMultiplier));
        clock.advance(1);
        e.advance();
        assert!(!e.state().is_active(AbilityKind::TapMultiplier));
        assert!(!e.is_timer_scheduled(TimerKey::AbilityExpiry(AbilityKind::TapMultiplier)));
    }

    #[test]
    fn continuous_tapping_pulses_three_times_a_second() {
        let (mut e, clock, _) = engine();
        e.state.currency = 1_000.0;
        e.purchase_area(500).unwrap();
        e.activate_ability(AbilityKind::ContinuousTapping).unwrap();
        let clicks = e.state().total_clicks;
        clock.advance(1_000);
        e.advance();
        assert_eq!(e.state().total_clicks - clicks, 3);
    }

    #[test]
    fn observers_see_timer_events() {
        let (mut e, clock, _) = engine();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        e.subscribe(Box::new(move |ev, _| sink.borrow_mut().push(ev.clone())));
        e.tap();
        e.purchase_area(1).unwrap();
        clock.advance(1_000);
        e.advance();
        let events = events.borrow();
        assert!(matches!(events[0], EngineEvent::Tapped { .. }));
        assert!(matches!(events[1], EngineEvent::AreaPurchased { amount: 1, .. }));
        assert!(events
            .iter()
            .any(|ev| matches!(ev, EngineEvent::PassiveIncome { .. })));
    }

    #[test]
    fn reset_cancels_timers_and_removes_save() {
        let (mut e, _, store) = engine();
        e.tap();
        e.purchase_area(100).unwrap();
        e.activate_ability(AbilityKind::TapMultiplier).unwrap();
        e.reset_game();
        assert_eq!(e.state(), &EngineState::new());
        assert!(store.get("earthGameState").is_none());
        assert!(!e.is_timer_scheduled(TimerKey::PassiveIncome));
        assert!(!e.is_timer_scheduled(TimerKey::AbilityExpiry(AbilityKind::TapMultiplier)));
        assert!(e.is_timer_scheduled(TimerKey::AutoSave));
    }

    #[test]
    fn store_failures_are_swallowed() {
        let (mut e, _, store) = engine();
        store.set_failing(true);
        e.tap();
        assert!(!e.save_now());
        assert!((e.state().currency - 100.0).abs() < 0.001);
        store.set_failing(false);
        assert!(e.save_now());
    }

    #[test]
    fn unreadable_save_is_discarded() {
        let clock = ManualClock::new(START);
        let store = MemoryStore::new();
        store.insert("earthGameState", "{{{ not json");
        let mut e = Engine::new(
            EngineConfig::default(),
            Box::new(store.clone()),
            Box::new(clock),
        );
        e.init();
        assert_eq!(e.state(), &EngineState::new());
        assert!(store.get("earthGameState").is_none());
    }

    #[test]
    fn dispose_stops_timers() {
        let (mut e, clock, store) = engine();
        e.tap();
        e.purchase_area(10).unwrap();
        e.dispose();
        let currency = e.state().currency;
        clock.advance(60_000);
        e.advance();
        assert!((e.state().currency - currency).abs() < f64::EPSILON);
        assert!(e.next_timer_due().is_none());
        let saved = save::decode(&store.get("earthGameState").unwrap()).unwrap();
        assert!((saved.currency - currency).abs() < 1e-9);
    }

    #[test]
    fn disposed_engine_stops_writing() {
        let (mut e, _, store) = engine();
        e.tap();
        e.dispose();
        let final_blob = store.get("earthGameState").unwrap();
        e.tap();
        assert!(!e.save_now());
        assert_eq!(store.get("earthGameState").unwrap(), final_blob);
        assert_eq!(e.state().total_clicks, 2);
        e.reset_game();
        assert_eq!(store.get("earthGameState").unwrap(), final_blob);
    }

    #[test]
    fn current_region_tracks_area() {
        let (mut e, _, _) = engine();
        assert_eq!(e.current_region().map(|r| r.id), Some(1));
        e.state.total_area_owned = 2e12;
        assert_eq!(e.current_region().map(|r| r.id), Some(3));
        assert_eq!(e.region_breadcrumb().region_id, 3);
    }
}
