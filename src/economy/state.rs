//! Earth Tycoon economy state definitions.

use super::catalog::{
    region_template, regional_bonus, AbilityKind, BuildingType, RegionCategory, RegionTemplate,
    REGIONS,
};

/// Earons per tap before any area is owned.
pub const BASE_INCOME_PER_CLICK: f64 = 100.0;

/// Passive income added per area unit owned.
pub const INCOME_PER_AREA: f64 = 0.01;

/// Share of passive income added to each tap.
pub const CLICK_SHARE_OF_INCOME: f64 = 0.01;

/// A single structure placed in a region.
#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    pub id: String,
    pub kind: BuildingType,
    pub level: u8,
    pub region_id: u32,
}

impl Building {
    /// Earons per second this building earns in a region of `category`.
    pub fn income(&self, category: RegionCategory) -> f64 {
        self.kind.base_income(self.level) * regional_bonus(self.kind, category)
    }

    /// Tap bonus percent this building contributes in a region of `category`.
    pub fn click_bonus(&self, category: RegionCategory) -> f64 {
        self.kind.click_bonus(self.level) * regional_bonus(self.kind, category)
    }
}

/// A region and the buildings placed in it.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub id: u32,
    pub category: RegionCategory,
    pub slot_capacity: u32,
    pub buildings: Vec<Building>,
    pub unlocked: bool,
}

impl Region {
    fn from_template(t: &RegionTemplate) -> Self {
        Self {
            id: t.id,
            category: t.category,
            slot_capacity: t.slot_capacity,
            buildings: Vec::new(),
            // Region 1 is always open.
            unlocked: t.id == 1,
        }
    }

    /// Catalog name, e.g. "Coconut Island".
    pub fn name(&self) -> &'static str {
        region_template(self.id)
            .map(|t| t.name)
            .unwrap_or("Unknown Region")
    }

    pub fn used_slots(&self) -> u32 {
        self.buildings.iter().map(|b| b.kind.slot_cost()).sum()
    }

    pub fn available_slots(&self) -> u32 {
        self.slot_capacity.saturating_sub(self.used_slots())
    }

    pub fn income(&self) -> f64 {
        self.buildings.iter().map(|b| b.income(self.category)).sum()
    }
}

/// Persisted status of one timed ability.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityState {
    pub kind: AbilityKind,
    /// Never reverts once set.
    pub unlocked: bool,
    pub active: bool,
    /// Wall-clock ms of the last activation; None if never activated.
    pub last_activated_at: Option<u64>,
}

impl AbilityState {
    pub fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            unlocked: false,
            active: false,
            last_activated_at: None,
        }
    }

    /// When the current active window ends, if the ability was ever used.
    pub fn active_until(&self) -> Option<u64> {
        self.last_activated_at
            .map(|t| t.saturating_add(self.kind.duration_ms()))
    }

    /// First instant at which the ability may be activated again.
    pub fn ready_at(&self, cooldown_ms: u64) -> Option<u64> {
        self.active_until().map(|t| t.saturating_add(cooldown_ms))
    }
}

/// Full game state. Owned exclusively by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineState {
    pub currency: f64,
    pub income_per_click: f64,
    /// From owned area only. Building income is summed on demand.
    pub income_per_second: f64,
    pub total_clicks: u64,
    pub total_area_owned: f64,
    pub next_area_unit_cost: f64,
    /// Batch size used by "buy selected".
    pub area_purchase_amount: u64,
    pub regions: Vec<Region>,
    /// Indexed by `AbilityKind::index()`.
    pub abilities: [AbilityState; 3],
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            currency: 0.0,
            income_per_click: BASE_INCOME_PER_CLICK,
            income_per_second: 0.0,
            total_clicks: 0,
            total_area_owned: 0.0,
            next_area_unit_cost: 1.0,
            area_purchase_amount: 1,
            regions: REGIONS.iter().map(Region::from_template).collect(),
            abilities: [
                AbilityState::new(AbilityKind::TapMultiplier),
                AbilityState::new(AbilityKind::ContinuousTapping),
                AbilityState::new(AbilityKind::StealingLand),
            ],
        }
    }

    pub fn region(&self, id: u32) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn region_mut(&mut self, id: u32) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.id == id)
    }

    pub fn ability(&self, kind: AbilityKind) -> &AbilityState {
        &self.abilities[kind.index()]
    }

    pub fn ability_mut(&mut self, kind: AbilityKind) -> &mut AbilityState {
        &mut self.abilities[kind.index()]
    }

    pub fn is_active(&self, kind: AbilityKind) -> bool {
        self.ability(kind).active
    }

    /// Every building with the category of the region it sits in.
    pub fn buildings(&self) -> impl Iterator<Item = (&Building, RegionCategory)> {
        self.regions
            .iter()
            .flat_map(|r| r.buildings.iter().map(move |b| (b, r.category)))
    }

    pub fn building(&self, id: &str) -> Option<&Building> {
        self.buildings().map(|(b, _)| b).find(|b| b.id == id)
    }

    /// (region index, building index) of a building id.
    pub fn locate_building(&self, id: &str) -> Option<(usize, usize)> {
        self.regions.iter().enumerate().find_map(|(ri, r)| {
            r.buildings
                .iter()
                .position(|b| b.id == id)
                .map(|bi| (ri, bi))
        })
    }

    pub fn building_count(&self) -> usize {
        self.regions.iter().map(|r| r.buildings.len()).sum()
    }

    /// Income of one building, using its region's category.
    pub fn building_income(&self, building: &Building) -> f64 {
        match self.region(building.region_id) {
            Some(r) => building.income(r.category),
            None => 0.0,
        }
    }

    pub fn total_building_income(&self) -> f64 {
        self.regions.iter().map(Region::income).sum()
    }

    /// Raw sum of tap bonus percentages across all buildings.
    pub fn total_click_bonus_percent(&self) -> f64 {
        self.buildings().map(|(b, c)| b.click_bonus(c)).sum()
    }

    /// Land income plus building income per second.
    pub fn total_passive_income(&self) -> f64 {
        self.income_per_second + self.total_building_income()
    }

    /// Whether the passive income tick has anything to pay out.
    pub fn has_income_sources(&self) -> bool {
        self.income_per_second > 0.0 || self.regions.iter().any(|r| !r.buildings.is_empty())
    }

    pub fn unlocked_region_count(&self) -> usize {
        self.regions.iter().filter(|r| r.unlocked).count()
    }
}
