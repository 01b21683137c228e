//! Poll loop
//!
//! Drives repeated reconciliation cycles on a fixed interval. There is no
//! change-notification machinery; every cycle re-walks both trees from
//! scratch and the interval bounds how stale the destination can get.

use std::thread;
use std::time::Duration;

use tracing::info;

use crate::sync::{CycleReport, MirrorEngine};

/// Run reconciliation cycles at a fixed interval, or once.
///
/// `None` means single-shot: run exactly one cycle and return its report.
/// With an interval the loop runs until the process is terminated externally
/// and never returns; each cycle's summary is logged.
pub fn run(engine: &mut MirrorEngine, interval: Option<Duration>) -> CycleReport {
    let Some(interval) = interval else {
        return engine.run_cycle();
    };

    loop {
        let report = engine.run_cycle();
        info!(
            actions = report.actions.len(),
            errors = report.errors.len(),
            "cycle complete"
        );
        thread::sleep(interval);
    }
}
