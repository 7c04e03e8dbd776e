//! `scroll`: simulate a recycled list.
//!
//! A handful of slots are rebound round-robin to a longer list of
//! identities at a fixed interval, so slots are regularly reassigned while
//! their previous loads are still in flight.

use crate::console::ConsoleSurface;
use crate::error::CliError;
use crate::runner::CliRunner;
use bitmaploader::slot::{LoadState, SlotId};
use clap::Args;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Arguments for `scroll`.
#[derive(Debug, Args)]
pub struct ScrollArgs {
    /// Number of on-screen slots
    #[arg(long, default_value = "3")]
    pub slots: usize,

    /// Milliseconds between rebinds
    #[arg(long, default_value = "100")]
    pub interval_ms: u64,

    /// Seconds to wait for outstanding loads after the last rebind
    #[arg(long, default_value = "60")]
    pub timeout: u64,

    /// Print placeholder changes too
    #[arg(long)]
    pub verbose: bool,

    /// Identities (URLs) scrolled past, in order
    #[arg(required = true)]
    pub identities: Vec<String>,
}

/// Per-slot notification counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub started: usize,
    pub completed: usize,
    pub failed: usize,
}

impl Tally {
    fn record(&mut self, state: LoadState) {
        match state {
            LoadState::LoadingStarted => self.started += 1,
            LoadState::LoadingCompleted => self.completed += 1,
            LoadState::LoadingFailed => self.failed += 1,
        }
    }
}

/// Slot that shows identity `index` when scrolling past `slot_count` rows.
pub fn slot_for(index: usize, slot_count: usize) -> usize {
    index % slot_count
}

/// Run `scroll`.
pub async fn run(args: ScrollArgs, runner: &CliRunner) -> Result<(), CliError> {
    if args.slots == 0 {
        return Err(CliError::Usage("--slots must be at least 1".to_string()));
    }
    runner.log_startup("scroll");

    let tallies: Arc<Mutex<HashMap<SlotId, Tally>>> = Arc::default();
    let mut host = runner.host();
    let mut rows = Vec::with_capacity(args.slots);

    for row in 0..args.slots {
        let id = host.add_slot(ConsoleSurface::new(format!("row {}", row), args.verbose));
        let sink = Arc::clone(&tallies);
        if let Some(slot) = host.slot_mut(id) {
            slot.set_state_change_listener(move |id: SlotId, state: LoadState| {
                sink.lock().entry(id).or_default().record(state);
            });
        }
        rows.push(id);
    }

    let interval = Duration::from_millis(args.interval_ms);
    for (index, identity) in args.identities.iter().enumerate() {
        let row = slot_for(index, rows.len());
        println!("[row {}] bind {}", row, identity);
        host.request(rows[row], identity, runner.loader())?;
        host.run_for(interval).await;
    }

    let waited = Duration::from_secs(args.timeout);
    let ids = rows.clone();
    let settled = host
        .run_until(
            move |h| {
                ids.iter()
                    .all(|id| h.slot(*id).map_or(true, |s| !s.phase().is_pending()))
            },
            waited,
        )
        .await;

    println!();
    println!("Final state:");
    let tallies = tallies.lock();
    for (row, id) in rows.iter().enumerate() {
        let Some(slot) = host.slot(*id) else { continue };
        let tally = tallies.get(id).copied().unwrap_or_default();
        println!(
            "  row {}: {} [{}] started={} completed={} failed={}",
            row,
            slot.identity().unwrap_or("-"),
            slot.phase(),
            tally.started,
            tally.completed,
            tally.failed,
        );
    }

    let network = runner.loader().network_pool();
    let disk = runner.loader().disk_pool();
    println!(
        "  tasks: network={} disk={}",
        network.submitted(),
        disk.submitted()
    );
    info!(
        rebinds = args.identities.len(),
        network_tasks = network.submitted(),
        disk_tasks = disk.submitted(),
        "Scroll complete"
    );

    if !settled {
        return Err(CliError::Timeout { waited });
    }
    Ok(())
}
