//! `fetch`: drive one slot through a sequence of identities.
//!
//! Each identity supersedes the previous one, the way a recycled list row
//! is rebound while scrolling. Only the last identity can end up on screen.

use crate::console::CaptureSurface;
use crate::error::CliError;
use crate::runner::CliRunner;
use bitmaploader::slot::{LoadState, RequestOutcome, SlotId, SlotPhase};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Arguments for `fetch`.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Image identities (URLs), requested in order on the same slot
    #[arg(required = true)]
    pub identities: Vec<String>,

    /// Save the final image here (format chosen from the extension)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Seconds to wait for the last identity to settle
    #[arg(long, default_value = "60")]
    pub timeout: u64,
}

/// Run `fetch`.
pub async fn run(args: FetchArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("fetch");

    let mut host = runner.host();
    let capture = CaptureSurface::default();
    let slot = host.add_slot(capture.clone());
    if let Some(s) = host.slot_mut(slot) {
        s.set_state_change_listener(|id: SlotId, state: LoadState| {
            println!("[{}] {}", id, state);
        });
    }

    let Some(last) = args.identities.last().cloned() else {
        return Err(CliError::Usage("at least one identity is required".to_string()));
    };

    for identity in &args.identities {
        let outcome = host.request(slot, identity, runner.loader())?;
        match outcome {
            RequestOutcome::Unchanged => println!("{} (already requested)", identity),
            RequestOutcome::MemoryHit => println!("{} (memory cache)", identity),
            RequestOutcome::Dispatched(source) => println!("{} ({} pool)", identity, source),
        }
        host.pump();
    }

    let waited = Duration::from_secs(args.timeout);
    let settled = host
        .run_until(
            move |h| h.slot(slot).is_some_and(|s| s.phase().is_settled()),
            waited,
        )
        .await;
    if !settled {
        return Err(CliError::Timeout { waited });
    }

    let phase = host.slot(slot).map(|s| s.phase()).unwrap_or_default();
    if phase == SlotPhase::Failed {
        return Err(CliError::LoadFailed { identity: last });
    }

    let Some(image) = capture.last() else {
        return Err(CliError::LoadFailed { identity: last });
    };
    println!("Loaded {} ({}x{})", last, image.width(), image.height());
    info!(identity = %last, width = image.width(), height = image.height(), "Fetch complete");

    if let Some(path) = args.output {
        image
            .save(&path)
            .map_err(|error| CliError::FileWrite {
                path: path.clone(),
                error,
            })?;
        println!("Saved to {}", path.display());
    }

    Ok(())
}
