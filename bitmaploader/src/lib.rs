//! bitmaploader - identity-checked asynchronous image loading for
//! recycled display slots.
//!
//! List and grid UIs reuse a small number of on-screen positions for a much
//! larger set of images. Each position (an [`ImageSlot`](slot::ImageSlot))
//! is rebound to a new image identity whenever it scrolls, while loads for
//! earlier identities may still be in flight. This crate makes sure a slot
//! only ever shows the image for the identity it currently wants:
//!
//! - memory cache hits are shown immediately
//! - misses are served from the disk cache or the network on bounded pools
//! - superseded requests are cancelled through weak task handles
//! - results are checked on arrival and again after a short presentation
//!   delay, and dropped if the slot has moved on
//!
//! # Example
//!
//! ```ignore
//! use bitmaploader::config::ConfigFile;
//! use bitmaploader::host::SlotHost;
//! use bitmaploader::loader::BitmapLoader;
//! use bitmaploader::slot::NullSurface;
//!
//! let config = ConfigFile::load()?;
//! let loader = BitmapLoader::from_config(&config)?;
//! let mut host = SlotHost::with_config(config.slot_config());
//!
//! let row = host.add_slot(NullSurface);
//! host.request(row, "https://example.com/cat.png", &loader)?;
//! host.run_for(std::time::Duration::from_secs(2)).await;
//! ```

pub mod bitmap;
pub mod cache;
pub mod config;
pub mod executor;
pub mod host;
pub mod loader;
pub mod logging;
pub mod provider;
pub mod slot;

#[cfg(test)]
mod testing;

/// Version of the library and CLI, from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
