//! Reconciliation engine and its supporting types

mod deferral;
mod engine;
mod report;

pub use deferral::DeferralQueue;
pub use engine::{MirrorEngine, MirrorOptions};
pub use report::CycleReport;
