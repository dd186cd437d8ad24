//! Error types.
//!
//! Rule violations (not enough Earons, no free slots, ability on cooldown…)
//! are ordinary outcomes of a command and come back as typed results with a
//! stable `reason()` code. Infrastructure failures (storage, config) are
//! separate so callers can log them without confusing them with gameplay.

use thiserror::Error;

use crate::economy::catalog::AbilityKind;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },

    /// A value parsed but is unusable.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Errors from a blob store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend cannot be reached at all (e.g. no `localStorage`).
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Why a stored blob could not be turned back into a game.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("save data is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("save data is not a JSON object")]
    NotAnObject,

    #[error("save version {saved} is older than the minimum supported {min}")]
    TooOld { saved: u32, min: u32 },
}

/// Why an area purchase was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PurchaseError {
    #[error("purchase amount must be at least 1")]
    InvalidAmount,

    #[error("not enough Earons: need {required} but have {owned}")]
    Credits { required: f64, owned: f64 },
}

impl PurchaseError {
    pub fn reason(&self) -> &'static str {
        match self {
            PurchaseError::InvalidAmount => "invalid_amount",
            PurchaseError::Credits { .. } => "credits",
        }
    }
}

/// Why a build was rejected. Checked in declaration order; the first
/// failing check is reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("region {region_id} does not exist")]
    Invalid { region_id: u32 },

    #[error("building locked: need {required} m² owned but have {owned}")]
    LandRequirement { required: f64, owned: f64 },

    #[error("not enough Earons: need {required} but have {owned}")]
    Credits { required: f64, owned: f64 },

    #[error("not enough slots: need {required} but {available} available")]
    Slots { required: u32, available: u32 },
}

impl BuildError {
    pub fn reason(&self) -> &'static str {
        match self {
            BuildError::Invalid { .. } => "invalid",
            BuildError::LandRequirement { .. } => "land_requirement",
            BuildError::Credits { .. } => "credits",
            BuildError::Slots { .. } => "slots",
        }
    }
}

/// Why an upgrade was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpgradeError {
    #[error("building {0} not found")]
    NotFound(String),

    #[error("building is already at max level")]
    MaxLevel,

    #[error("not enough Earons: need {required} but have {owned}")]
    Credits { required: f64, owned: f64 },
}

impl UpgradeError {
    pub fn reason(&self) -> &'static str {
        match self {
            UpgradeError::NotFound(_) => "not_found",
            UpgradeError::MaxLevel => "max_level",
            UpgradeError::Credits { .. } => "credits",
        }
    }
}

/// Why a demolition was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DemolishError {
    #[error("building {0} not found")]
    NotFound(String),
}

impl DemolishError {
    pub fn reason(&self) -> &'static str {
        match self {
            DemolishError::NotFound(_) => "not_found",
        }
    }
}

/// Why an ability activation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbilityError {
    #[error("{} is still locked", .0.name())]
    Locked(AbilityKind),

    #[error("{} is already active", .0.name())]
    AlreadyActive(AbilityKind),

    #[error("{} is cooling down ({remaining_secs}s left)", .kind.name())]
    CoolingDown { kind: AbilityKind, remaining_secs: u64 },
}

impl AbilityError {
    pub fn reason(&self) -> &'static str {
        match self {
            AbilityError::Locked(_) => "locked",
            AbilityError::AlreadyActive(_) => "already_active",
            AbilityError::CoolingDown { .. } => "cooling_down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_error_reason_codes() {
        assert_eq!(BuildError::Invalid { region_id: 0 }.reason(), "invalid");
        assert_eq!(
            BuildError::LandRequirement { required: 1.0, owned: 0.0 }.reason(),
            "land_requirement"
        );
        assert_eq!(
            BuildError::Credits { required: 1.0, owned: 0.0 }.reason(),
            "credits"
        );
        assert_eq!(
            BuildError::Slots { required: 2, available: 1 }.reason(),
            "slots"
        );
    }

    #[test]
    fn ability_error_message_names_the_ability() {
        let err = AbilityError::CoolingDown {
            kind: AbilityKind::TapMultiplier,
            remaining_secs: 42,
        };
        assert_eq!(err.to_string(), "Tap Multiplier is cooling down (42s left)");
        assert_eq!(err.reason(), "cooling_down");
    }

    #[test]
    fn purchase_error_message_includes_amounts() {
        let err = PurchaseError::Credits {
            required: 10.5,
            owned: 3.0,
        };
        assert_eq!(err.to_string(), "not enough Earons: need 10.5 but have 3");
    }
}
