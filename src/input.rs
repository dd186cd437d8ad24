//! Text command parsing for line-based front-ends.
//!
//! This module knows nothing about the engine. It turns a line such as
//! `build 3 solar_panel` into a [`Command`] the front-end dispatches.

use thiserror::Error;

use crate::economy::catalog::{AbilityKind, BuildingType};

/// How many area units a `buy` should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyAmount {
    Units(u64),
    /// As many as the current balance allows.
    Max,
    /// The batch size previously chosen with `select`.
    Selected,
}

/// All commands a text front-end can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tap,
    /// Tap repeatedly in one go.
    TapTimes(u32),
    Buy(BuyAmount),
    Select(u64),
    Build { region_id: u32, kind: BuildingType },
    Upgrade(String),
    Demolish(String),
    Ability(AbilityKind),
    Status,
    Regions,
    Buildings,
    Save,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown building type `{0}`")]
    UnknownBuilding(String),
    #[error("unknown ability `{0}` (tap, continuous, steal)")]
    UnknownAbility(String),
}

pub const HELP: &str = "\
commands:
  tap [n]                      tap the planet (n times)
  buy <n> | buy max | buy      buy area units (bare `buy` uses the selection)
  select <n>                   choose the batch size for bare `buy`
  build <region> <type>        construct a building, e.g. `build 1 solar_panel`
  upgrade <id>                 raise a building one level
  demolish <id>                remove a building for a 50% refund
  ability <tap|continuous|steal>
  status | regions | buildings
  save | reset | help | quit";

/// Parse one line of input.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ParseError::Empty);
    };
    let args: Vec<&str> = words.collect();

    match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("tap" | "t", []) => Ok(Command::Tap),
        ("tap" | "t", [n]) => n
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .map(Command::TapTimes)
            .ok_or(ParseError::Usage("tap [n]")),

        ("buy" | "b", []) => Ok(Command::Buy(BuyAmount::Selected)),
        ("buy" | "b", [n]) if n.eq_ignore_ascii_case("max") => Ok(Command::Buy(BuyAmount::Max)),
        ("buy" | "b", [n]) => n
            .parse::<u64>()
            .map(|n| Command::Buy(BuyAmount::Units(n)))
            .map_err(|_| ParseError::Usage("buy <n> | buy max")),

        ("select", [n]) => n
            .parse::<u64>()
            .map(Command::Select)
            .map_err(|_| ParseError::Usage("select <n>")),

        ("build", [region, kind]) => {
            let region_id = region
                .parse::<u32>()
                .map_err(|_| ParseError::Usage("build <region> <type>"))?;
            let kind = parse_building(kind)?;
            Ok(Command::Build { region_id, kind })
        }
        ("upgrade", [id]) => Ok(Command::Upgrade(id.to_string())),
        ("demolish", [id]) => Ok(Command::Demolish(id.to_string())),
        ("ability" | "a", [name]) => parse_ability(name).map(Command::Ability),

        ("status" | "s", []) => Ok(Command::Status),
        ("regions", []) => Ok(Command::Regions),
        ("buildings", []) => Ok(Command::Buildings),
        ("save", []) => Ok(Command::Save),
        ("reset", []) => Ok(Command::Reset),
        ("help" | "?", _) => Ok(Command::Help),
        ("quit" | "exit" | "q", []) => Ok(Command::Quit),

        ("tap" | "t", _) => Err(ParseError::Usage("tap [n]")),
        ("buy" | "b", _) => Err(ParseError::Usage("buy <n> | buy max")),
        ("select", _) => Err(ParseError::Usage("select <n>")),
        ("build", _) => Err(ParseError::Usage("build <region> <type>")),
        ("upgrade", _) => Err(ParseError::Usage("upgrade <id>")),
        ("demolish", _) => Err(ParseError::Usage("demolish <id>")),
        ("ability" | "a", _) => Err(ParseError::Usage("ability <tap|continuous|steal>")),
        _ => Err(ParseError::Unknown(head.to_string())),
    }
}

/// Accepts the save key (`solar_panel`) or the display name without spaces
/// (`solarpanel`), case-insensitively.
fn parse_building(word: &str) -> Result<BuildingType, ParseError> {
    let wanted = word.to_ascii_lowercase().replace('-', "_");
    BuildingType::from_key(&wanted)
        .or_else(|| {
            BuildingType::all()
                .iter()
                .copied()
                .find(|t| t.key().replace('_', "") == wanted)
        })
        .ok_or_else(|| ParseError::UnknownBuilding(word.to_string()))
}

/// Short names, or the save key (`tapMultiplier`).
fn parse_ability(word: &str) -> Result<AbilityKind, ParseError> {
    if let Some(kind) = AbilityKind::from_key(word) {
        return Ok(kind);
    }
    match word.to_ascii_lowercase().as_str() {
        "tap" | "multiplier" | "tapmultiplier" => Ok(AbilityKind::TapMultiplier),
        "continuous" | "auto" | "continuoustapping" => Ok(AbilityKind::ContinuousTapping),
        "steal" | "stealing" | "stealingland" => Ok(AbilityKind::StealingLand),
        _ => Err(ParseError::UnknownAbility(word.to_string())),
    }
}
