//! Static game data: building types, region templates, abilities, and the
//! regional bonus table. Nothing in here is ever mutated.

use serde::{Deserialize, Serialize};

/// Area units per region. Region N unlocks at `(N - 1) * AREA_PER_REGION`.
pub const AREA_PER_REGION: f64 = 1_000_000_000_000.0;

/// Number of regions in the catalog.
pub const REGION_COUNT: u32 = 150;

/// Highest building level.
pub const MAX_BUILDING_LEVEL: u8 = 3;

/// Fraction of the build cost charged in arctic regions.
pub const ARCTIC_COST_FACTOR: f64 = 0.75;

/// Fraction of the total paid cost returned on demolition.
pub const DEMOLISH_REFUND_FACTOR: f64 = 0.5;

/// Kinds of buildings, in catalog order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    SolarPanel,
    WindTurbine,
    MiningStation,
    ResearchLab,
    Factory,
    SpaceElevator,
    FusionReactor,
    QuantumComputer,
    Megacity,
    DysonSphere,
    GalacticPortal,
    UniverseEngine,
}

/// Numeric definition of a building type.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingConfig {
    /// Region slots occupied by one building of this type.
    pub slot_cost: u32,
    /// Cost of reaching each level (index 0 = build, 1 = first upgrade, …).
    pub base_cost: [f64; 3],
    /// Earons per second at each level, before the regional bonus.
    pub base_income: [f64; 3],
    /// Tap bonus in percent at each level, for the few types that have one.
    pub click_bonus: Option<[f64; 3]>,
    /// First region (1-based) whose land threshold unlocks this type.
    pub unlock_region: u32,
}

static BUILDING_CONFIGS: [BuildingConfig; 12] = [
    // Tier 1
    BuildingConfig {
        slot_cost: 1,
        base_cost: [100.0, 500.0, 2_500.0],
        base_income: [0.5, 1.2, 3.0],
        click_bonus: None,
        unlock_region: 1,
    },
    BuildingConfig {
        slot_cost: 1,
        base_cost: [500.0, 2_000.0, 10_000.0],
        base_income: [1.2, 3.0, 7.5],
        click_bonus: None,
        unlock_region: 1,
    },
    BuildingConfig {
        slot_cost: 1,
        base_cost: [2_000.0, 8_000.0, 40_000.0],
        base_income: [2.5, 6.0, 15.0],
        click_bonus: None,
        unlock_region: 1,
    },
    // Tier 2
    BuildingConfig {
        slot_cost: 2,
        base_cost: [15_000.0, 60_000.0, 300_000.0],
        base_income: [8.0, 20.0, 50.0],
        click_bonus: Some([50.0, 100.0, 200.0]),
        unlock_region: 10,
    },
    BuildingConfig {
        slot_cost: 2,
        base_cost: [25_000.0, 100_000.0, 500_000.0],
        base_income: [12.0, 30.0, 75.0],
        click_bonus: None,
        unlock_region: 10,
    },
    BuildingConfig {
        slot_cost: 3,
        base_cost: [100_000.0, 400_000.0, 2_000_000.0],
        base_income: [25.0, 60.0, 150.0],
        click_bonus: None,
        unlock_region: 15,
    },
    // Tier 3
    BuildingConfig {
        slot_cost: 4,
        base_cost: [1_000_000.0, 4_000_000.0, 20_000_000.0],
        base_income: [100.0, 250.0, 625.0],
        click_bonus: None,
        unlock_region: 51,
    },
    BuildingConfig {
        slot_cost: 3,
        base_cost: [2_000_000.0, 8_000_000.0, 40_000_000.0],
        base_income: [80.0, 200.0, 500.0],
        click_bonus: Some([500.0, 1_000.0, 2_000.0]),
        unlock_region: 51,
    },
    BuildingConfig {
        slot_cost: 5,
        base_cost: [5_000_000.0, 20_000_000.0, 100_000_000.0],
        base_income: [200.0, 500.0, 1_250.0],
        click_bonus: None,
        unlock_region: 60,
    },
    // Tier 4
    BuildingConfig {
        slot_cost: 8,
        base_cost: [100_000_000.0, 500_000_000.0, 2_500_000_000.0],
        base_income: [1_000.0, 2_500.0, 6_250.0],
        click_bonus: None,
        unlock_region: 101,
    },
    BuildingConfig {
        slot_cost: 10,
        base_cost: [1_000_000_000.0, 5_000_000_000.0, 25_000_000_000.0],
        base_income: [2_000.0, 5_000.0, 12_500.0],
        click_bonus: Some([5_000.0, 10_000.0, 20_000.0]),
        unlock_region: 120,
    },
    BuildingConfig {
        slot_cost: 15,
        base_cost: [10_000_000_000.0, 50_000_000_000.0, 250_000_000_000.0],
        base_income: [5_000.0, 12_500.0, 31_250.0],
        click_bonus: None,
        unlock_region: 130,
    },
];

impl BuildingType {
    /// All building types in catalog order.
    pub fn all() -> &'static [BuildingType] {
        &[
            BuildingType::SolarPanel,
            BuildingType::WindTurbine,
            BuildingType::MiningStation,
            BuildingType::ResearchLab,
            BuildingType::Factory,
            BuildingType::SpaceElevator,
            BuildingType::FusionReactor,
            BuildingType::QuantumComputer,
            BuildingType::Megacity,
            BuildingType::DysonSphere,
            BuildingType::GalacticPortal,
            BuildingType::UniverseEngine,
        ]
    }

    /// Index into `all()`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            BuildingType::SolarPanel => "Solar Panel",
            BuildingType::WindTurbine => "Wind Turbine",
            BuildingType::MiningStation => "Mining Station",
            BuildingType::ResearchLab => "Research Lab",
            BuildingType::Factory => "Factory",
            BuildingType::SpaceElevator => "Space Elevator",
            BuildingType::FusionReactor => "Fusion Reactor",
            BuildingType::QuantumComputer => "Quantum Computer",
            BuildingType::Megacity => "Megacity",
            BuildingType::DysonSphere => "Dyson Sphere",
            BuildingType::GalacticPortal => "Galactic Portal",
            BuildingType::UniverseEngine => "Universe Engine",
        }
    }

    /// Stable identifier used in save data and building ids.
    pub fn key(self) -> &'static str {
        match self {
            BuildingType::SolarPanel => "solar_panel",
            BuildingType::WindTurbine => "wind_turbine",
            BuildingType::MiningStation => "mining_station",
            BuildingType::ResearchLab => "research_lab",
            BuildingType::Factory => "factory",
            BuildingType::SpaceElevator => "space_elevator",
            BuildingType::FusionReactor => "fusion_reactor",
            BuildingType::QuantumComputer => "quantum_computer",
            BuildingType::Megacity => "megacity",
            BuildingType::DysonSphere => "dyson_sphere",
            BuildingType::GalacticPortal => "galactic_portal",
            BuildingType::UniverseEngine => "universe_engine",
        }
    }

    /// Inverse of `key()`.
    pub fn from_key(key: &str) -> Option<BuildingType> {
        BuildingType::all().iter().copied().find(|t| t.key() == key)
    }

    pub fn config(self) -> &'static BuildingConfig {
        &BUILDING_CONFIGS[self.index()]
    }

    pub fn slot_cost(self) -> u32 {
        self.config().slot_cost
    }

    /// Land that must be owned before this type can be built.
    pub fn land_requirement(self) -> f64 {
        (self.config().unlock_region - 1) as f64 * AREA_PER_REGION
    }

    /// Cost to construct in a region of the given category.
    pub fn build_cost(self, category: RegionCategory) -> f64 {
        let cost = self.config().base_cost[0];
        if category == RegionCategory::Arctic {
            (cost * ARCTIC_COST_FACTOR).floor()
        } else {
            cost
        }
    }

    /// Cost to go from `level` to `level + 1`, or None at max level.
    pub fn upgrade_cost(self, level: u8) -> Option<f64> {
        if level == 0 || level >= MAX_BUILDING_LEVEL {
            return None;
        }
        self.config().base_cost.get(level as usize).copied()
    }

    /// Half of everything paid to reach `level`, rounded down.
    pub fn demolish_refund(self, level: u8) -> f64 {
        let paid: f64 = self
            .config()
            .base_cost
            .iter()
            .take(level as usize)
            .sum();
        (paid * DEMOLISH_REFUND_FACTOR).floor()
    }

    /// Income per second at `level` before the regional bonus.
    pub fn base_income(self, level: u8) -> f64 {
        level
            .checked_sub(1)
            .and_then(|i| self.config().base_income.get(i as usize))
            .copied()
            .unwrap_or(0.0)
    }

    /// Tap bonus percent at `level` before the regional bonus.
    pub fn click_bonus(self, level: u8) -> f64 {
        match (&self.config().click_bonus, level.checked_sub(1)) {
            (Some(bonus), Some(i)) => bonus.get(i as usize).copied().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

/// Terrain category of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionCategory {
    Island,
    Forest,
    Arctic,
    Desert,
}

impl RegionCategory {
    pub fn name(self) -> &'static str {
        match self {
            RegionCategory::Island => "island",
            RegionCategory::Forest => "forest",
            RegionCategory::Arctic => "arctic",
            RegionCategory::Desert => "desert",
        }
    }
}

/// Income multiplier for a building type placed in a region category.
/// Combinations not listed earn the base rate.
pub fn regional_bonus(kind: BuildingType, category: RegionCategory) -> f64 {
    use BuildingType::*;
    match (category, kind) {
        (RegionCategory::Island, SolarPanel) => 1.25,
        (RegionCategory::Island, WindTurbine) => 1.50,
        (RegionCategory::Island, MiningStation) => 1.30,

        (RegionCategory::Forest, ResearchLab) => 1.50,
        (RegionCategory::Forest, Factory) => 1.25,
        (RegionCategory::Forest, Megacity) => 1.40,

        (RegionCategory::Arctic, QuantumComputer) => 1.75,
        (RegionCategory::Arctic, SpaceElevator) => 1.60,

        (RegionCategory::Desert, SolarPanel) => 2.00,
        (RegionCategory::Desert, WindTurbine) => 1.25,
        (RegionCategory::Desert, MiningStation) => 1.50,
        (RegionCategory::Desert, ResearchLab) => 1.25,
        (RegionCategory::Desert, Factory) => 1.75,
        (RegionCategory::Desert, FusionReactor) => 1.25,
        (RegionCategory::Desert, QuantumComputer) => 1.50,
        (RegionCategory::Desert, SpaceElevator) => 1.25,
        (RegionCategory::Desert, Megacity) => 1.25,
        (RegionCategory::Desert, DysonSphere) => 1.50,
        (RegionCategory::Desert, GalacticPortal) => 1.75,
        (RegionCategory::Desert, UniverseEngine) => 2.00,

        _ => 1.0,
    }
}

/// Timed abilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AbilityKind {
    TapMultiplier,
    ContinuousTapping,
    StealingLand,
}

impl AbilityKind {
    pub fn all() -> &'static [AbilityKind] {
        &[
            AbilityKind::TapMultiplier,
            AbilityKind::ContinuousTapping,
            AbilityKind::StealingLand,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            AbilityKind::TapMultiplier => "Tap Multiplier",
            AbilityKind::ContinuousTapping => "Continuous Tapping",
            AbilityKind::StealingLand => "Stealing Land",
        }
    }

    /// Key used in save data.
    pub fn key(self) -> &'static str {
        match self {
            AbilityKind::TapMultiplier => "tapMultiplier",
            AbilityKind::ContinuousTapping => "continuousTapping",
            AbilityKind::StealingLand => "stealingLand",
        }
    }

    pub fn from_key(key: &str) -> Option<AbilityKind> {
        AbilityKind::all().iter().copied().find(|k| k.key() == key)
    }

    /// Length of the active window in seconds.
    pub fn duration_secs(self) -> u64 {
        match self {
            AbilityKind::TapMultiplier => 30,
            AbilityKind::ContinuousTapping => 60,
            AbilityKind::StealingLand => 45,
        }
    }

    pub fn duration_ms(self) -> u64 {
        self.duration_secs() * 1_000
    }

    /// Tap value multiplier while active (1.0 for abilities that don't scale taps).
    pub fn multiplier(self) -> f64 {
        match self {
            AbilityKind::TapMultiplier => 1.5,
            AbilityKind::ContinuousTapping | AbilityKind::StealingLand => 1.0,
        }
    }

    /// Owned area at which the ability unlocks.
    pub fn unlock_area(self) -> f64 {
        match self {
            AbilityKind::TapMultiplier => 100.0,
            AbilityKind::ContinuousTapping => 500.0,
            AbilityKind::StealingLand => 2_000_000.0,
        }
    }
}

/// Fixed identity of a region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionTemplate {
    pub id: u32,
    pub name: &'static str,
    pub category: RegionCategory,
    pub slot_capacity: u32,
}

const fn region(
    id: u32,
    name: &'static str,
    category: RegionCategory,
    slot_capacity: u32,
) -> RegionTemplate {
    RegionTemplate {
        id,
        name,
        category,
        slot_capacity,
    }
}

/// All regions in unlock order. `REGIONS[i].id == i + 1`.
pub static REGIONS: [RegionTemplate; REGION_COUNT as usize] = [
    region(1, "Coconut Island", RegionCategory::Island, 1),
    region(2, "Low Isles", RegionCategory::Island, 1),
    region(3, "Mud Island", RegionCategory::Island, 2),
    region(4, "Peel Island", RegionCategory::Island, 2),
    region(5, "St Helena Island", RegionCategory::Island, 3),
    region(6, "Coochiemudlo Island", RegionCategory::Island, 3),
    region(7, "Karragarra Island", RegionCategory::Island, 3),
    region(8, "Lamb Island", RegionCategory::Island, 3),
    region(9, "Macleay Island", RegionCategory::Island, 4),
    region(10, "Russell Island", RegionCategory::Island, 4),
    region(11, "Lady Elliot Island", RegionCategory::Island, 4),
    region(12, "Heron Island", RegionCategory::Island, 4),
    region(13, "Lizard Island", RegionCategory::Island, 4),
    region(14, "Green Island", RegionCategory::Island, 5),
    region(15, "Fitzroy Island", RegionCategory::Island, 5),
    region(16, "Bedarra Island", RegionCategory::Island, 5),
    region(17, "Dunk Island", RegionCategory::Island, 5),
    region(18, "Palm Island", RegionCategory::Island, 6),
    region(19, "Hamilton Island", RegionCategory::Island, 6),
    region(20, "Possession Island", RegionCategory::Island, 6),
    region(21, "Horn Island", RegionCategory::Island, 6),
    region(22, "Prince of Wales Island AU", RegionCategory::Island, 7),
    region(23, "Thursday Island", RegionCategory::Island, 7),
    region(24, "Barrow Island", RegionCategory::Island, 7),
    region(25, "Barrow Island", RegionCategory::Island, 8),
    region(26, "Dirk Hartog Island", RegionCategory::Island, 8),
    region(27, "Garden Island", RegionCategory::Island, 8),
    region(28, "Rottnest Island", RegionCategory::Island, 8),
    region(29, "Chagos Archipelago", RegionCategory::Island, 9),
    region(30, "Christmas Island", RegionCategory::Island, 10),
    region(31, "Lakshadweep", RegionCategory::Island, 10),
    region(32, "Maldives", RegionCategory::Island, 10),
    region(33, "Seychelles", RegionCategory::Island, 11),
    region(34, "Malta", RegionCategory::Island, 11),
    region(35, "Socotra", RegionCategory::Island, 12),
    region(36, "Reunion", RegionCategory::Island, 12),
    region(37, "Mauritius", RegionCategory::Island, 12),
    region(38, "Comoros", RegionCategory::Island, 13),
    region(39, "Cape Verde", RegionCategory::Island, 13),
    region(40, "Madeira", RegionCategory::Island, 14),
    region(41, "Frankland Islands", RegionCategory::Island, 14),
    region(42, "Wellesley Islands", RegionCategory::Island, 15),
    region(43, "Torres Strait Islands", RegionCategory::Island, 15),
    region(44, "Nicobar Islands", RegionCategory::Island, 15),
    region(45, "Andaman Islands", RegionCategory::Island, 16),
    region(46, "Azores", RegionCategory::Island, 16),
    region(47, "Canary Islands", RegionCategory::Island, 17),
    region(48, "Balearic Islands", RegionCategory::Island, 17),
    region(49, "Chatham Islands", RegionCategory::Island, 17),
    region(50, "Lord Howe Island", RegionCategory::Island, 18),
    region(51, "Magnetic Island", RegionCategory::Forest, 20),
    region(52, "Norfolk Island", RegionCategory::Forest, 20),
    region(53, "Phillip Island", RegionCategory::Forest, 21),
    region(54, "French Island", RegionCategory::Forest, 21),
    region(55, "Hinchinbrook Island", RegionCategory::Forest, 22),
    region(56, "Whitsunday Island", RegionCategory::Forest, 22),
    region(57, "Moreton Island", RegionCategory::Forest, 23),
    region(58, "North Stradbroke Island", RegionCategory::Forest, 23),
    region(59, "South Stradbroke Island", RegionCategory::Forest, 23),
    region(60, "Bribie Island", RegionCategory::Forest, 24),
    region(61, "Mornington Island", RegionCategory::Forest, 24),
    region(62, "Groote Eylandt", RegionCategory::Forest, 25),
    region(63, "Bathurst Island AU", RegionCategory::Forest, 25),
    region(64, "Melville Island AU", RegionCategory::Forest, 25),
    region(65, "Flinders Island", RegionCategory::Forest, 26),
    region(66, "King Island", RegionCategory::Forest, 26),
    region(67, "Stewart Island", RegionCategory::Forest, 27),
    region(68, "Fraser Island", RegionCategory::Forest, 27),
    region(69, "Kangaroo Island", RegionCategory::Forest, 27),
    region(70, "Cyprus", RegionCategory::Forest, 28),
    region(71, "Crete", RegionCategory::Forest, 28),
    region(72, "Corsica", RegionCategory::Forest, 29),
    region(73, "Taiwan", RegionCategory::Forest, 29),
    region(74, "Kyushu", RegionCategory::Forest, 29),
    region(75, "Kyushu", RegionCategory::Forest, 30),
    region(76, "Sicily", RegionCategory::Forest, 30),
    region(77, "Hainan", RegionCategory::Forest, 31),
    region(78, "Shikoku", RegionCategory::Forest, 31),
    region(79, "Sardinia", RegionCategory::Forest, 31),
    region(80, "Manitoulin Island", RegionCategory::Forest, 32),
    region(81, "Long Island", RegionCategory::Forest, 32),
    region(82, "Cape Breton Island", RegionCategory::Forest, 33),
    region(83, "Anticosti Island", RegionCategory::Forest, 33),
    region(84, "Prince Edward Island", RegionCategory::Forest, 33),
    region(85, "Cornwallis Island", RegionCategory::Forest, 34),
    region(86, "Graham Island", RegionCategory::Forest, 34),
    region(87, "Borden Island", RegionCategory::Forest, 35),
    region(88, "Eglinton Island", RegionCategory::Forest, 35),
    region(89, "Mackenzie King Island", RegionCategory::Forest, 35),
    region(90, "Prince Charles Island", RegionCategory::Forest, 36),
    region(91, "Amund Ringnes Island", RegionCategory::Forest, 36),
    region(92, "October Revolution Island", RegionCategory::Forest, 37),
    region(93, "Bylot Island", RegionCategory::Forest, 37),
    region(94, "Ellef Ringnes Island", RegionCategory::Forest, 37),
    region(95, "Prince Patrick Island", RegionCategory::Forest, 38),
    region(96, "King William Island", RegionCategory::Forest, 38),
    region(97, "Bathurst Island", RegionCategory::Forest, 39),
    region(98, "Kotelny Island", RegionCategory::Forest, 39),
    region(99, "Somerset Island", RegionCategory::Forest, 39),
    region(100, "Prince of Wales Island", RegionCategory::Forest, 40),
    region(101, "Southampton Island", RegionCategory::Arctic, 42),
    region(102, "Vancouver Island", RegionCategory::Arctic, 42),
    region(103, "Melville Island", RegionCategory::Arctic, 43),
    region(104, "Axel Heiberg Island", RegionCategory::Arctic, 43),
    region(105, "Alexander Island", RegionCategory::Arctic, 44),
    region(106, "Berkner Island", RegionCategory::Arctic, 44),
    region(107, "Devon Island", RegionCategory::Arctic, 45),
    region(108, "Tasmania", RegionCategory::Arctic, 45),
    region(109, "Sri Lanka", RegionCategory::Arctic, 45),
    region(110, "Hispaniola", RegionCategory::Arctic, 46),
    region(111, "Banks Island", RegionCategory::Arctic, 46),
    region(112, "Hokkaido", RegionCategory::Arctic, 47),
    region(113, "Ireland", RegionCategory::Arctic, 47),
    region(114, "Mindanao", RegionCategory::Arctic, 47),
    region(115, "Luzon", RegionCategory::Arctic, 48),
    region(116, "Iceland", RegionCategory::Arctic, 48),
    region(117, "New Zealand North", RegionCategory::Arctic, 49),
    region(118, "Java", RegionCategory::Arctic, 49),
    region(119, "New Zealand South", RegionCategory::Arctic, 49),
    region(120, "Ellesmere Island", RegionCategory::Arctic, 50),
    region(121, "Sulawesi", RegionCategory::Arctic, 50),
    region(122, "Great Britain", RegionCategory::Arctic, 51),
    region(123, "Victoria Island", RegionCategory::Arctic, 51),
    region(124, "Honshu", RegionCategory::Arctic, 51),
    region(125, "Baffin Island", RegionCategory::Arctic, 52),
    region(126, "Sumatra", RegionCategory::Arctic, 52),
    region(127, "Madagascar", RegionCategory::Arctic, 53),
    region(128, "Borneo", RegionCategory::Arctic, 53),
    region(129, "New Guinea", RegionCategory::Arctic, 53),
    region(130, "Greenland", RegionCategory::Arctic, 54),
    region(131, "Mojave Desert", RegionCategory::Desert, 56),
    region(132, "Atacama Desert", RegionCategory::Desert, 57),
    region(133, "Strzelecki Desert", RegionCategory::Desert, 57),
    region(134, "Gibson Desert", RegionCategory::Desert, 57),
    region(135, "Sonoran Desert", RegionCategory::Desert, 58),
    region(136, "Great Basin Desert", RegionCategory::Desert, 58),
    region(137, "Chihuahuan Desert", RegionCategory::Desert, 58),
    region(138, "Thar Desert", RegionCategory::Desert, 59),
    region(139, "Taklamakan Desert", RegionCategory::Desert, 59),
    region(140, "Congo Basin", RegionCategory::Desert, 60),
    region(141, "Karakum Desert", RegionCategory::Desert, 60),
    region(142, "Scandinavian Peninsula", RegionCategory::Desert, 60),
    region(143, "Siberian Tundra", RegionCategory::Desert, 61),
    region(144, "Patagonia", RegionCategory::Desert, 61),
    region(145, "Gobi Desert", RegionCategory::Desert, 62),
    region(146, "Great Victoria Desert", RegionCategory::Desert, 62),
    region(147, "Kalahari Desert", RegionCategory::Desert, 62),
    region(148, "Antarctic Peninsula", RegionCategory::Desert, 63),
    region(149, "Amazon Rainforest", RegionCategory::Desert, 63),
    region(150, "Sahara Desert", RegionCategory::Desert, 64),
];

/// Look up a region template by id.
pub fn region_template(id: u32) -> Option<&'static RegionTemplate> {
    id.checked_sub(1).and_then(|i| REGIONS.get(i as usize))
}
