//! Work run on the disk and network pools.
//!
//! Both pipelines end the same way: decode off the async threads, put the
//! bitmap in the memory cache, then report through the slot's gate.

use super::error::LoadError;
use crate::bitmap::Bitmap;
use crate::cache::{BitmapCache, DiskCache};
use crate::executor::TaskContext;
use crate::provider::ImageFetcher;
use crate::slot::CompletionGate;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Fetch, persist to disk, decode.
///
/// A failed disk write is logged and otherwise ignored; the image is still
/// delivered.
pub(crate) async fn load_from_network(
    ctx: &TaskContext,
    identity: &str,
    fetcher: &dyn ImageFetcher,
    disk: &Arc<dyn DiskCache>,
    memory: &dyn BitmapCache,
) -> Result<Bitmap, LoadError> {
    let bytes = fetcher.fetch(identity).await?;
    if ctx.is_cancelled() {
        return Err(LoadError::Cancelled);
    }
    trace!(task = %ctx.id(), identity, bytes = bytes.len(), "Fetched");

    persist(disk, identity, bytes.clone()).await;

    let bitmap = decode(bytes).await?;
    memory.put(identity, bitmap.clone());
    Ok(bitmap)
}

/// Read the cached file and decode.
pub(crate) async fn load_from_disk(
    ctx: &TaskContext,
    identity: &str,
    disk: &dyn DiskCache,
    memory: &dyn BitmapCache,
) -> Result<Bitmap, LoadError> {
    let path = disk.locate(identity);
    let bytes = tokio::fs::read(&path).await?;
    if ctx.is_cancelled() {
        return Err(LoadError::Cancelled);
    }
    trace!(task = %ctx.id(), identity, path = %path.display(), "Read from disk cache");

    let bitmap = decode(Bytes::from(bytes)).await?;
    memory.put(identity, bitmap.clone());
    Ok(bitmap)
}

/// Hand a task's outcome to the slot. Cancelled tasks report nothing.
pub(crate) fn report(gate: &CompletionGate, identity: &str, result: Result<Bitmap, LoadError>) {
    let posted = match result {
        Ok(bitmap) => gate.on_success(bitmap, identity),
        Err(LoadError::Cancelled) => {
            debug!(slot = %gate.slot(), identity, "Load cancelled, not reporting");
            return;
        }
        Err(e) => {
            warn!(slot = %gate.slot(), identity, error = %e, "Image load failed");
            gate.on_failure(identity, &e)
        }
    };

    if let Err(e) = posted {
        warn!(slot = %gate.slot(), error = %e, "Completion rejected");
    }
}

async fn persist(disk: &Arc<dyn DiskCache>, identity: &str, bytes: Bytes) {
    let disk = Arc::clone(disk);
    let key = identity.to_string();

    match tokio::task::spawn_blocking(move || disk.store(&key, &bytes)).await {
        Ok(Ok(path)) => trace!(identity, path = %path.display(), "Stored in disk cache"),
        Ok(Err(e)) => warn!(identity, error = %e, "Failed to store in disk cache"),
        Err(e) => warn!(identity, error = %e, "Disk cache write task failed"),
    }
}

async fn decode(bytes: Bytes) -> Result<Bitmap, LoadError> {
    tokio::task::spawn_blocking(move || Bitmap::decode(&bytes))
        .await
        .map_err(|e| LoadError::Worker(e.to_string()))?
        .map_err(LoadError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::encode_png;
    use crate::cache::{FileDiskCache, MemoryCache};
    use crate::host::SlotHost;
    use crate::provider::FetchError;
    use crate::slot::{LoadState, NullSurface};
    use crate::testing::{recording_listener, ScriptedFetcher};
    use tempfile::TempDir;
    use tokio_util::sync::CancellationToken;

    const A: &str = "https://example.com/a.png";

    fn ctx() -> (TaskContext, CancellationToken) {
        let token = CancellationToken::new();
        (TaskContext::new(crate::executor::TaskId(0), token.clone()), token)
    }

    fn caches(temp: &TempDir) -> (Arc<dyn DiskCache>, MemoryCache) {
        let disk = FileDiskCache::new(temp.path().to_path_buf(), 1024 * 1024).unwrap();
        (Arc::new(disk), MemoryCache::new(1024 * 1024))
    }

    #[tokio::test]
    async fn test_network_load_fills_both_caches() {
        let temp = TempDir::new().unwrap();
        let (disk, memory) = caches(&temp);
        let image = Bitmap::solid(2, 2, [5, 6, 7, 255]);
        let fetcher = ScriptedFetcher::new().respond(A, encode_png(&image));
        let (ctx, _token) = ctx();

        let bitmap = load_from_network(&ctx, A, &fetcher, &disk, &memory)
            .await
            .unwrap();

        assert_eq!(bitmap, image);
        assert!(disk.exists(A));
        assert_eq!(memory.get(A), Some(image));
    }

    #[tokio::test]
    async fn test_network_failure_is_returned() {
        let temp = TempDir::new().unwrap();
        let (disk, memory) = caches(&temp);
        let fetcher = ScriptedFetcher::new().fail(
            A,
            FetchError::Status {
                status: 404,
                url: A.to_string(),
            },
        );
        let (ctx, _token) = ctx();

        let result = load_from_network(&ctx, A, &fetcher, &disk, &memory).await;

        assert!(matches!(result, Err(LoadError::Fetch(FetchError::Status { status: 404, .. }))));
        assert!(!disk.exists(A));
    }

    #[tokio::test]
    async fn test_cancelled_after_fetch_skips_caches() {
        let temp = TempDir::new().unwrap();
        let (disk, memory) = caches(&temp);
        let fetcher = ScriptedFetcher::new().respond(A, encode_png(&Bitmap::solid(1, 1, [0; 4])));
        let (ctx, token) = ctx();
        token.cancel();

        let result = load_from_network(&ctx, A, &fetcher, &disk, &memory).await;

        assert!(matches!(result, Err(LoadError::Cancelled)));
        assert!(!disk.exists(A));
        assert!(memory.get(A).is_none());
    }

    #[tokio::test]
    async fn test_disk_load_decodes_cached_file() {
        let temp = TempDir::new().unwrap();
        let (disk, memory) = caches(&temp);
        let image = Bitmap::solid(3, 1, [1, 1, 1, 255]);
        disk.store(A, &encode_png(&image)).unwrap();
        let (ctx, _token) = ctx();

        let bitmap = load_from_disk(&ctx, A, disk.as_ref(), &memory).await.unwrap();

        assert_eq!(bitmap, image);
        assert_eq!(memory.get(A), Some(image));
    }

    #[tokio::test]
    async fn test_corrupt_disk_file_is_decode_error() {
        let temp = TempDir::new().unwrap();
        let (disk, memory) = caches(&temp);
        disk.store(A, b"not an image").unwrap();
        let (ctx, _token) = ctx();

        let result = load_from_disk(&ctx, A, disk.as_ref(), &memory).await;

        assert!(matches!(result, Err(LoadError::Decode(_))));
    }

    #[tokio::test]
    async fn test_report_routes_outcomes() {
        let mut host = SlotHost::new();
        let id = host.add_slot(NullSurface);
        let (listener, states) = recording_listener();
        host.slot_mut(id).unwrap().set_state_change_listener(listener);
        let gate = host.gate(id).unwrap();

        report(&gate, A, Err(LoadError::Cancelled));
        assert_eq!(host.pump(), 0);

        report(&gate, A, Err(LoadError::Worker("panicked".to_string())));
        assert_eq!(host.pump(), 1);
        assert_eq!(*states.lock(), vec![LoadState::LoadingFailed]);
    }
}
