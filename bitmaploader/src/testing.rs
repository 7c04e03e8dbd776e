//! Test doubles shared by unit tests.

use crate::bitmap::Bitmap;
use crate::cache::{FileDiskCache, MemoryCache};
use crate::loader::BitmapLoader;
use crate::provider::{FetchError, FetchFuture, ImageFetcher};
use crate::slot::{DisplaySurface, LoadState, Presentation, SlotId, StateChangeListener};
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// What a [`RecordingSurface`] was asked to show.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SurfaceEvent {
    Placeholder(Option<Bitmap>),
    Present(Presentation),
}

/// Surface that remembers every call. Clones share the log.
#[derive(Clone, Default)]
pub(crate) struct RecordingSurface {
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl RecordingSurface {
    pub(crate) fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }
}

impl DisplaySurface for RecordingSurface {
    fn present(&mut self, presentation: Presentation) {
        self.events.lock().push(SurfaceEvent::Present(presentation));
    }

    fn present_placeholder(&mut self, placeholder: Option<&Bitmap>) {
        self.events
            .lock()
            .push(SurfaceEvent::Placeholder(placeholder.cloned()));
    }
}

/// A listener plus the log it appends to.
pub(crate) fn recording_listener() -> (impl StateChangeListener, Arc<Mutex<Vec<LoadState>>>) {
    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&states);
    let listener = move |_slot: SlotId, state: LoadState| sink.lock().push(state);
    (listener, states)
}

#[derive(Clone)]
enum Script {
    Respond(Bytes),
    Fail(FetchError),
    Hang,
}

/// Fetcher answering from a fixed script. Unscripted identities 404.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    scripts: HashMap<String, Script>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, identity: &str, body: Vec<u8>) -> Self {
        self.scripts
            .insert(identity.to_string(), Script::Respond(Bytes::from(body)));
        self
    }

    pub(crate) fn fail(mut self, identity: &str, error: FetchError) -> Self {
        self.scripts.insert(identity.to_string(), Script::Fail(error));
        self
    }

    /// Never completes for `identity`.
    pub(crate) fn hang(mut self, identity: &str) -> Self {
        self.scripts.insert(identity.to_string(), Script::Hang);
        self
    }
}

impl ImageFetcher for ScriptedFetcher {
    fn fetch<'a>(&'a self, identity: &'a str) -> FetchFuture<'a> {
        let script = self.scripts.get(identity).cloned();
        Box::pin(async move {
            match script {
                Some(Script::Respond(body)) => Ok(body),
                Some(Script::Fail(error)) => Err(error),
                Some(Script::Hang) => std::future::pending().await,
                None => Err(FetchError::Status {
                    status: 404,
                    url: identity.to_string(),
                }),
            }
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Loader over a fresh disk cache in `dir` and a 16 MB memory cache.
pub(crate) fn test_loader(dir: &Path, fetcher: Arc<dyn ImageFetcher>) -> BitmapLoader {
    let disk = FileDiskCache::new(dir.join("cache"), 16 * 1024 * 1024).unwrap();
    BitmapLoader::new(
        Arc::new(MemoryCache::new(16 * 1024 * 1024)),
        Arc::new(disk),
        fetcher,
    )
}
