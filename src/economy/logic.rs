//! Earth Tycoon economy rules. Pure functions over `EngineState`, fully testable.
//!
//! Nothing here reads the clock, touches storage or logs; the engine passes
//! "now" in and decides what to persist and announce.

use super::catalog::{AbilityKind, BuildingType, AREA_PER_REGION, MAX_BUILDING_LEVEL, REGION_COUNT};
use super::state::{
    Building, EngineState, BASE_INCOME_PER_CLICK, CLICK_SHARE_OF_INCOME, INCOME_PER_AREA,
};
use crate::error::{AbilityError, BuildError, DemolishError, PurchaseError, UpgradeError};

/// Growth factor of the area unit price per unit owned.
pub const AREA_COST_GROWTH: f64 = 1.0001;

/// Area gained by each tap while land stealing is active.
pub const STEAL_AREA_PER_TAP: f64 = 0.0001;

/// Tap base used when recomputing income-per-click during land stealing.
pub const STEAL_CLICK_BASE: f64 = 1.0;

/// Area units per breadcrumb "area" inside a region.
const AREA_PER_SUBAREA: f64 = 10_000_000_000.0;

/// Area units per breadcrumb "zone" inside a sub-area.
const AREA_PER_ZONE: f64 = 1_000_000_000.0;

/// Round to 2 decimals. Values too large to scale are returned unchanged.
pub fn round2(x: f64) -> f64 {
    let scaled = x * 100.0;
    if !scaled.is_finite() {
        return x;
    }
    scaled.round() / 100.0
}

// ── Area purchase ─────────────────────────────────────────

/// Price of one area unit when `area` units are already owned.
pub fn area_unit_cost(area: f64) -> f64 {
    AREA_COST_GROWTH.powf(area).max(1.0)
}

/// Total price of buying `amount` units at the current unit price.
pub fn projected_area_cost(state: &EngineState, amount: u64) -> f64 {
    area_unit_cost(state.total_area_owned) * amount as f64
}

/// Price of the currently selected batch.
pub fn selected_area_cost(state: &EngineState) -> f64 {
    projected_area_cost(state, state.area_purchase_amount)
}

/// Largest batch the player can afford; never less than 1.
pub fn max_affordable_area(state: &EngineState) -> u64 {
    if state.currency <= 0.0 {
        return 1;
    }
    let units = (state.currency / area_unit_cost(state.total_area_owned)).floor();
    if units.is_finite() && units >= 1.0 {
        units as u64
    } else {
        1
    }
}

/// Regions and abilities newly unlocked by an area change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Unlocks {
    pub regions: Vec<u32>,
    pub abilities: Vec<AbilityKind>,
}

/// Apply area-driven unlocks. Unlocks are monotonic: nothing is ever relocked.
pub fn refresh_unlocks(state: &mut EngineState) -> Unlocks {
    let mut unlocks = Unlocks::default();
    let reached = current_region_index(state);
    for region in state.regions.iter_mut() {
        if !region.unlocked && region.id <= reached {
            region.unlocked = true;
            unlocks.regions.push(region.id);
        }
    }
    let area = state.total_area_owned;
    for ability in state.abilities.iter_mut() {
        if !ability.unlocked && area >= ability.kind.unlock_area() {
            ability.unlocked = true;
            unlocks.abilities.push(ability.kind);
        }
    }
    unlocks
}

/// Result of a successful area purchase.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaPurchase {
    pub amount: u64,
    pub cost: f64,
    pub unlocks: Unlocks,
}

/// Buy `amount` area units at the current unit price.
pub fn purchase_area(state: &mut EngineState, amount: u64) -> Result<AreaPurchase, PurchaseError> {
    if amount == 0 {
        return Err(PurchaseError::InvalidAmount);
    }
    let cost = projected_area_cost(state, amount);
    if state.currency < cost {
        return Err(PurchaseError::Credits {
            required: cost,
            owned: state.currency,
        });
    }

    // 単価は購入前の面積で固定 (まとめ買いでも逓増しない)
    state.currency = round2(state.currency - cost);
    state.total_area_owned += amount as f64;
    state.income_per_second += amount as f64 * INCOME_PER_AREA;
    state.income_per_click = BASE_INCOME_PER_CLICK + state.income_per_second * CLICK_SHARE_OF_INCOME;
    state.next_area_unit_cost = area_unit_cost(state.total_area_owned);
    let unlocks = refresh_unlocks(state);

    Ok(AreaPurchase {
        amount,
        cost,
        unlocks,
    })
}

/// Select the batch size for `purchase_selected_area`. Clamped to at least 1.
pub fn set_area_purchase_amount(state: &mut EngineState, amount: u64) {
    state.area_purchase_amount = amount.max(1);
}

/// Buy the selected batch. The selection resets to 1 on success.
pub fn purchase_selected_area(state: &mut EngineState) -> Result<AreaPurchase, PurchaseError> {
    let receipt = purchase_area(state, state.area_purchase_amount)?;
    state.area_purchase_amount = 1;
    Ok(receipt)
}

// ── Tap ───────────────────────────────────────────────────

/// What a single tap produced.
#[derive(Clone, Debug, PartialEq)]
pub struct TapOutcome {
    pub value: f64,
    pub stole_area: bool,
    pub unlocks: Unlocks,
}

/// Tap once. `steal_click_base` replaces the standard tap base while land
/// stealing is active.
pub fn tap(state: &mut EngineState, steal_click_base: f64) -> TapOutcome {
    let bonus_percent = state.total_click_bonus_percent();
    let mut value = state.income_per_click;
    if bonus_percent > 0.0 {
        value += state.income_per_click * bonus_percent / 100.0;
    }
    if state.is_active(AbilityKind::TapMultiplier) {
        value *= AbilityKind::TapMultiplier.multiplier();
    }

    // タップ値は盗み処理の前の income_per_click で確定させる
    let stole_area = state.is_active(AbilityKind::StealingLand);
    let mut unlocks = Unlocks::default();
    if stole_area {
        state.total_area_owned += STEAL_AREA_PER_TAP;
        state.income_per_second += STEAL_AREA_PER_TAP * INCOME_PER_AREA;
        state.income_per_click = steal_click_base + state.income_per_second * CLICK_SHARE_OF_INCOME;
        state.next_area_unit_cost = area_unit_cost(state.total_area_owned);
        unlocks = refresh_unlocks(state);
    }

    state.currency = round2(state.currency + value);
    state.total_clicks += 1;

    TapOutcome {
        value,
        stole_area,
        unlocks,
    }
}

// ── Buildings ─────────────────────────────────────────────

/// Construct a level-1 building. Checks run in a fixed order and the first
/// failure is reported. Returns the new building's id.
pub fn build_building(
    state: &mut EngineState,
    region_id: u32,
    kind: BuildingType,
    now_ms: u64,
) -> Result<String, BuildError> {
    let region = state
        .region(region_id)
        .ok_or(BuildError::Invalid { region_id })?;

    let required = kind.land_requirement();
    if state.total_area_owned < required {
        return Err(BuildError::LandRequirement {
            required,
            owned: state.total_area_owned,
        });
    }

    let cost = kind.build_cost(region.category);
    if state.currency < cost {
        return Err(BuildError::Credits {
            required: cost,
            owned: state.currency,
        });
    }

    let available = region.available_slots();
    if kind.slot_cost() > available {
        return Err(BuildError::Slots {
            required: kind.slot_cost(),
            available,
        });
    }

    // 検証はすべて通過済み。ここから先は失敗しない
    let id = fresh_building_id(state, region_id, kind, now_ms);
    state.currency = round2(state.currency - cost);
    if let Some(region) = state.region_mut(region_id) {
        region.buildings.push(Building {
            id: id.clone(),
            kind,
            level: 1,
            region_id,
        });
    }
    Ok(id)
}

/// `"{region}-{type}-{now}"`, with `-{n}` appended when that id is taken.
fn fresh_building_id(state: &EngineState, region_id: u32, kind: BuildingType, now_ms: u64) -> String {
    let base = format!("{}-{}-{}", region_id, kind.key(), now_ms);
    if state.building(&base).is_none() {
        return base;
    }
    (1u64..)
        .map(|n| format!("{}-{}", base, n))
        .find(|id| state.building(id).is_none())
        .unwrap_or(base)
}

/// Result of a successful upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub new_level: u8,
    pub cost: f64,
}

/// Raise a building one level.
pub fn upgrade_building(state: &mut EngineState, id: &str) -> Result<Upgrade, UpgradeError> {
    let (ri, bi) = state
        .locate_building(id)
        .ok_or_else(|| UpgradeError::NotFound(id.to_string()))?;
    let building = &state.regions[ri].buildings[bi];
    if building.level >= MAX_BUILDING_LEVEL {
        return Err(UpgradeError::MaxLevel);
    }
    let cost = building
        .kind
        .upgrade_cost(building.level)
        .ok_or(UpgradeError::MaxLevel)?;
    if state.currency < cost {
        return Err(UpgradeError::Credits {
            required: cost,
            owned: state.currency,
        });
    }

    state.currency = round2(state.currency - cost);
    let building = &mut state.regions[ri].buildings[bi];
    building.level += 1;
    Ok(Upgrade {
        new_level: building.level,
        cost,
    })
}

/// Remove a building and refund half of everything paid for it. Returns the refund.
pub fn demolish_building(state: &mut EngineState, id: &str) -> Result<f64, DemolishError> {
    let (ri, bi) = state
        .locate_building(id)
        .ok_or_else(|| DemolishError::NotFound(id.to_string()))?;
    let building = state.regions[ri].buildings.remove(bi);
    let refund = building.kind.demolish_refund(building.level);
    state.currency = round2(state.currency + refund);
    Ok(refund)
}

// ── Abilities ─────────────────────────────────────────────

/// Start an ability's active window at `now_ms`.
pub fn activate_ability(
    state: &mut EngineState,
    kind: AbilityKind,
    now_ms: u64,
    cooldown_ms: u64,
) -> Result<(), AbilityError> {
    let ability = state.ability(kind);
    if !ability.unlocked {
        return Err(AbilityError::Locked(kind));
    }
    if ability.active {
        return Err(AbilityError::AlreadyActive(kind));
    }
    if let Some(ready_at) = ability.ready_at(cooldown_ms) {
        if now_ms < ready_at {
            return Err(AbilityError::CoolingDown {
                kind,
                remaining_secs: ceil_secs(ready_at - now_ms),
            });
        }
    }

    let ability = state.ability_mut(kind);
    ability.active = true;
    ability.last_activated_at = Some(now_ms);
    Ok(())
}

/// End an ability's active window. Returns false if it was not active.
pub fn expire_ability(state: &mut EngineState, kind: AbilityKind) -> bool {
    let ability = state.ability_mut(kind);
    let was_active = ability.active;
    ability.active = false;
    was_active
}

/// Derived ability status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownStatus {
    Active,
    Cooldown,
    Ready,
}

impl CooldownStatus {
    pub fn name(self) -> &'static str {
        match self {
            CooldownStatus::Active => "active",
            CooldownStatus::Cooldown => "cooldown",
            CooldownStatus::Ready => "ready",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CooldownInfo {
    pub status: CooldownStatus,
    /// Seconds until the status changes, rounded up. 0 when ready.
    pub remaining_secs: u64,
}

pub fn ability_cooldown_info(
    state: &EngineState,
    kind: AbilityKind,
    now_ms: u64,
    cooldown_ms: u64,
) -> CooldownInfo {
    let ability = state.ability(kind);
    if ability.active {
        let remaining = ability
            .active_until()
            .map_or(0, |end| end.saturating_sub(now_ms));
        return CooldownInfo {
            status: CooldownStatus::Active,
            remaining_secs: ceil_secs(remaining),
        };
    }
    match ability.ready_at(cooldown_ms) {
        Some(ready_at) if now_ms < ready_at => CooldownInfo {
            status: CooldownStatus::Cooldown,
            remaining_secs: ceil_secs(ready_at - now_ms),
        },
        _ => CooldownInfo {
            status: CooldownStatus::Ready,
            remaining_secs: 0,
        },
    }
}

fn ceil_secs(ms: u64) -> u64 {
    ms / 1_000 + u64::from(ms % 1_000 != 0)
}

// ── Passive income ────────────────────────────────────────

/// Pay one second of passive income. Returns the amount paid.
pub fn passive_income_tick(state: &mut EngineState) -> f64 {
    let income = state.total_passive_income();
    state.currency = round2(state.currency + income);
    income
}

// ── Region position ───────────────────────────────────────

/// 1-based index of the region the owned area currently reaches.
pub fn current_region_index(state: &EngineState) -> u32 {
    // 最終地域 (150) で頭打ち
    let reached = (state.total_area_owned / AREA_PER_REGION).floor() + 1.0;
    if reached.is_finite() && reached < REGION_COUNT as f64 {
        reached as u32
    } else {
        REGION_COUNT
    }
}

/// Position of the owned-area frontier inside the current region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Breadcrumb {
    pub region_id: u32,
    /// 1..=100
    pub area: u32,
    /// 1..=10
    pub zone: u32,
}

pub fn region_breadcrumb(state: &EngineState) -> Breadcrumb {
    let rem = state.total_area_owned % AREA_PER_REGION;
    let area = ((rem / AREA_PER_SUBAREA).floor() + 1.0).min(100.0);
    let zone = (((rem % AREA_PER_SUBAREA) / AREA_PER_ZONE).floor() + 1.0).min(10.0);
    Breadcrumb {
        region_id: current_region_index(state),
        area: if area.is_finite() { area as u32 } else { 1 },
        zone: if zone.is_finite() { zone as u32 } else { 1 },
    }
}
