//! Relationship-strength scoring.
//!
//! `formula`, `overlap` and `adjust` are pure functions over values already in
//! memory. `cycle` drives one batch against a `StrengthStore`.

pub mod adjust;
pub mod cycle;
pub mod formula;
pub mod overlap;
pub mod store;

pub use cycle::{
    run_cycle, run_cycle_now, score_contact, ContactScore, CycleSummary, StrengthBreakdown,
};
pub use store::StrengthStore;
