//! Balance simulator for Earth Tycoon.
//! Run with: cargo test simulate_greedy -- --nocapture

#[cfg(test)]
mod tests {
    use crate::economy::catalog::{AbilityKind, BuildingType};
    use crate::economy::logic;
    use crate::economy::state::EngineState;

    const COOLDOWN_MS: u64 = 120_000;

    /// What to buy next.
    enum Purchase {
        Area(u64),
        Build(u32, BuildingType),
        Upgrade(String),
    }

    /// Income gained per Earon spent; higher is better.
    fn yield_ratio(gain: f64, cost: f64) -> f64 {
        if cost <= 0.0 {
            0.0
        } else {
            gain / cost
        }
    }

    /// Pick the affordable purchase with the best income per Earon.
    fn find_best_purchase(state: &EngineState) -> Option<Purchase> {
        let mut best: Option<(f64, Purchase)> = None;
        let consider = |ratio: f64, p: Purchase, best: &mut Option<(f64, Purchase)>| {
            if ratio > 0.0 && best.as_ref().map_or(true, |(b, _)| ratio > *b) {
                *best = Some((ratio, p));
            }
        };

        let amount = logic::max_affordable_area(state);
        let cost = logic::projected_area_cost(state, amount);
        if cost <= state.currency {
            // Area pays 0.01/s per unit plus a sliver of tap value.
            consider(yield_ratio(amount as f64 * 0.01, cost), Purchase::Area(amount), &mut best);
        }

        for region in state.regions.iter().filter(|r| r.unlocked) {
            for &kind in BuildingType::all() {
                if state.total_area_owned < kind.land_requirement()
                    || kind.slot_cost() > region.available_slots()
                {
                    continue;
                }
                let cost = kind.build_cost(region.category);
                if cost > state.currency {
                    continue;
                }
                let gain = kind.base_income(1)
                    * crate::economy::catalog::regional_bonus(kind, region.category);
                consider(yield_ratio(gain, cost), Purchase::Build(region.id, kind), &mut best);
            }
            for b in &region.buildings {
                let Some(cost) = b.kind.upgrade_cost(b.level) else {
                    continue;
                };
                if cost > state.currency {
                    continue;
                }
                let bonus = crate::economy::catalog::regional_bonus(b.kind, region.category);
                let gain = (b.kind.base_income(b.level + 1) - b.kind.base_income(b.level)) * bonus;
                consider(yield_ratio(gain, cost), Purchase::Upgrade(b.id.clone()), &mut best);
            }
        }

        best.map(|(_, p)| p)
    }

    fn check_invariants(state: &EngineState, area_before: f64) {
        assert!(state.currency >= 0.0, "negative currency {}", state.currency);
        assert!(state.total_area_owned >= area_before);
        for r in &state.regions {
            assert!(r.used_slots() <= r.slot_capacity, "region {} over capacity", r.id);
        }
    }

    /// One simulated second: 5 taps, abilities when ready, passive income,
    /// then spend greedily.
    fn step(state: &mut EngineState, now_ms: u64) {
        for &kind in AbilityKind::all() {
            let a = state.ability(kind);
            if a.active && a.active_until().map_or(false, |end| now_ms >= end) {
                logic::expire_ability(state, kind);
            }
            let _ = logic::activate_ability(state, kind, now_ms, COOLDOWN_MS);
        }
        // 手動 5 回/秒 + 連打アビリティ中は 3 回/秒を上乗せ
        let taps = if state.is_active(AbilityKind::ContinuousTapping) { 8 } else { 5 };
        for _ in 0..taps {
            logic::tap(state, logic::STEAL_CLICK_BASE);
        }
        logic::passive_income_tick(state);

        // 1 秒あたり最大 20 回まで買い物する
        for _ in 0..20 {
            let area_before = state.total_area_owned;
            let bought = match find_best_purchase(state) {
                Some(Purchase::Area(n)) => logic::purchase_area(state, n).is_ok(),
                Some(Purchase::Build(r, k)) => logic::build_building(state, r, k, now_ms).is_ok(),
                Some(Purchase::Upgrade(id)) => logic::upgrade_building(state, &id).is_ok(),
                None => false,
            };
            check_invariants(state, area_before);
            if !bought {
                break;
            }
        }
    }

    #[test]
    fn simulate_greedy() {
        let mut state = EngineState::new();
        let mut now_ms = 1_700_000_000_000u64;
        let checkpoints = [60u64, 300, 900, 1_800, 3_600];
        let mut next = 0;

        for second in 1..=3_600u64 {
            now_ms += 1_000;
            step(&mut state, now_ms);
            if next < checkpoints.len() && second == checkpoints[next] {
                println!(
                    "[{:>5}s] currency={:.2} area={:.1} ips={:.3} buildings={} unlocked_abilities={}",
                    second,
                    state.currency,
                    state.total_area_owned,
                    state.total_passive_income(),
                    state.building_count(),
                    state.abilities.iter().filter(|a| a.unlocked).count(),
                );
                next += 1;
            }
        }

        // 1 時間で最初の 2 アビリティと建物に届くこと
        assert!(state.ability(AbilityKind::TapMultiplier).unlocked);
        assert!(state.ability(AbilityKind::ContinuousTapping).unlocked);
        assert!(state.building_count() > 0);
        assert!(state.total_clicks >= 5 * 3_600);
    }
}
