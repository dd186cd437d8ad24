//! Earth Tycoon: the economy engine of an idle planet-tapping game.
//!
//! Players tap to earn Earons, spend them on area and on buildings spread
//! across 150 regions, and trigger timed abilities. [`economy::Engine`] owns
//! the state and timers; everything else is data, rules and plumbing.

pub mod config;
pub mod economy;
pub mod error;
pub mod input;
pub mod time;
