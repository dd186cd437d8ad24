//! Change notifications for front-ends.

use std::collections::BTreeMap;

use super::catalog::AbilityKind;
use super::state::EngineState;

/// What just happened to the state.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    Loaded,
    Tapped { value: f64 },
    AreaPurchased { amount: u64, cost: f64 },
    AreaSelectionChanged { amount: u64 },
    BuildingBuilt { id: String },
    BuildingUpgraded { id: String, level: u8 },
    BuildingDemolished { id: String, refund: f64 },
    AbilityActivated(AbilityKind),
    AbilityExpired(AbilityKind),
    RegionUnlocked(u32),
    AbilityUnlocked(AbilityKind),
    PassiveIncome { amount: f64 },
    Saved,
    Reset,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

pub type Observer = Box<dyn FnMut(&EngineEvent, &EngineState)>;

/// Registry of observers. Callers must not rely on invocation order.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    observers: BTreeMap<u64, Observer>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.observers.insert(id, observer);
        SubscriptionId(id)
    }

    /// Returns false if the id was unknown or already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(&id.0).is_some()
    }

    pub fn notify(&mut self, event: &EngineEvent, state: &EngineState) {
        for observer in self.observers.values_mut() {
            observer(event, state);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.observers.len())
            .finish()
    }
}
