//! The slot coordinator.

use super::gate::CompletionGate;
use super::surface::{DisplaySurface, Presentation, StateChangeListener, DEFAULT_CROSSFADE};
use super::types::{validate_identity, LoadState, RequestOutcome, SlotError, SlotId, SlotPhase};
use crate::bitmap::Bitmap;
use crate::executor::WeakTaskHandle;
use crate::host::{HostHandle, HostMessage};
use crate::loader::BitmapLoader;
use std::time::Duration;
use tracing::{debug, trace};

/// Default wait between a load finishing and the image being shown.
pub const DEFAULT_PRESENTATION_DELAY: Duration = Duration::from_millis(300);

/// Per-slot settings applied when a slot is created.
#[derive(Clone, Debug)]
pub struct SlotConfig {
    /// Wait before a loaded image is re-checked and shown
    pub presentation_delay: Duration,
    /// Length of the placeholder-to-image transition
    pub crossfade: Duration,
    /// Shown while nothing is loaded
    pub placeholder: Option<Bitmap>,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            presentation_delay: DEFAULT_PRESENTATION_DELAY,
            crossfade: DEFAULT_CROSSFADE,
            placeholder: None,
        }
    }
}

/// One on-screen image position.
///
/// The slot remembers the identity it currently wants, serves memory-cache
/// hits on the spot and hands everything else to the loader. It keeps only a
/// weak handle to the dispatched task. Every rebind starts a new assignment,
/// and results come back through the host tagged with the assignment they
/// were dispatched for. They are checked twice, once when they arrive and
/// again after the presentation delay. A result is used only if both its
/// identity and its assignment are still current, so at most one result is
/// accepted per assignment. Anything else is dropped without touching the
/// screen.
///
/// All methods run on the owning context.
pub struct ImageSlot {
    id: SlotId,
    /// Empty when nothing is requested
    desired_identity: String,
    /// Bumped on every rebind and clear
    assignment: u64,
    current_request: Option<WeakTaskHandle>,
    placeholder: Option<Bitmap>,
    is_loaded: bool,
    phase: SlotPhase,
    presentation_delay: Duration,
    crossfade: Duration,
    surface: Box<dyn DisplaySurface>,
    listener: Option<Box<dyn StateChangeListener>>,
    handle: HostHandle,
}

impl ImageSlot {
    pub(crate) fn new(
        id: SlotId,
        surface: Box<dyn DisplaySurface>,
        handle: HostHandle,
        config: &SlotConfig,
    ) -> Self {
        Self {
            id,
            desired_identity: String::new(),
            assignment: 0,
            current_request: None,
            placeholder: config.placeholder.clone(),
            is_loaded: false,
            phase: SlotPhase::Idle,
            presentation_delay: config.presentation_delay,
            crossfade: config.crossfade,
            surface,
            listener: None,
            handle,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    /// The identity the slot currently wants, if any.
    pub fn identity(&self) -> Option<&str> {
        if self.desired_identity.is_empty() {
            None
        } else {
            Some(&self.desired_identity)
        }
    }

    /// Counter of identity assignments, bumped by every rebind and clear.
    pub fn assignment(&self) -> u64 {
        self.assignment
    }

    /// Returns true while the displayed content reflects a loaded image.
    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn phase(&self) -> SlotPhase {
        self.phase
    }

    pub fn placeholder(&self) -> Option<&Bitmap> {
        self.placeholder.as_ref()
    }

    /// Weak handle to the most recently dispatched task.
    pub fn current_request(&self) -> Option<&WeakTaskHandle> {
        self.current_request.as_ref()
    }

    pub fn presentation_delay(&self) -> Duration {
        self.presentation_delay
    }

    pub fn set_presentation_delay(&mut self, delay: Duration) {
        self.presentation_delay = delay;
    }

    pub fn crossfade(&self) -> Duration {
        self.crossfade
    }

    pub fn set_crossfade(&mut self, duration: Duration) {
        self.crossfade = duration;
    }

    /// A gate that posts results back to this slot for the current
    /// assignment.
    pub fn gate(&self) -> CompletionGate {
        CompletionGate::new(self.id, self.assignment, self.handle.clone())
    }

    /// Register the slot's state listener, replacing any previous one.
    pub fn set_state_change_listener(&mut self, listener: impl StateChangeListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_state_change_listener(&mut self) {
        self.listener = None;
    }

    /// Set the placeholder. Shown at once unless an image is loaded.
    pub fn set_placeholder(&mut self, placeholder: Option<Bitmap>) {
        self.placeholder = placeholder;
        if !self.is_loaded {
            self.surface.present_placeholder(self.placeholder.as_ref());
        }
    }

    /// Bind the slot to `identity`.
    ///
    /// Re-requesting the current identity does nothing. Otherwise any
    /// in-flight request is cancelled, and the image comes from the memory
    /// cache immediately or is dispatched to the disk or network pool with
    /// the placeholder shown in the meantime.
    pub fn request_identity(
        &mut self,
        identity: &str,
        loader: &BitmapLoader,
    ) -> Result<RequestOutcome, SlotError> {
        let identity = validate_identity(identity, "identity")?;

        if identity == self.desired_identity {
            trace!(slot = %self.id, identity, "Identity unchanged");
            return Ok(RequestOutcome::Unchanged);
        }

        self.cancel_current();
        self.assignment = self.assignment.wrapping_add(1);
        self.desired_identity = identity.to_string();

        if let Some(bitmap) = loader.memory_cache().get(identity) {
            debug!(slot = %self.id, identity, "Memory cache hit");
            self.surface.present(Presentation::Immediate(bitmap));
            self.is_loaded = true;
            self.phase = SlotPhase::Completed;
            self.notify(LoadState::LoadingCompleted);
            return Ok(RequestOutcome::MemoryHit);
        }

        self.surface.present_placeholder(self.placeholder.as_ref());

        let source = loader.source_for(identity);
        let task = loader.dispatch(source, identity, self.gate());
        debug!(slot = %self.id, identity, %source, task = %task.id(), "Load dispatched");

        self.current_request = Some(task.downgrade());
        self.phase = SlotPhase::Dispatched;
        self.notify(LoadState::LoadingStarted);

        Ok(RequestOutcome::Dispatched(source))
    }

    /// Cancel the in-flight request, if any.
    ///
    /// The task is interrupted if it is still running. The slot is marked
    /// not loaded; its phase and desired identity are left alone.
    pub fn cancel_current(&mut self) {
        if let Some(request) = self.current_request.take() {
            if request.cancel(true) {
                debug!(slot = %self.id, task = %request.id(), "Cancelled in-flight request");
            }
        }
        self.is_loaded = false;
    }

    /// Forget the current identity and show the placeholder.
    pub fn clear(&mut self) {
        self.cancel_current();
        self.assignment = self.assignment.wrapping_add(1);
        self.desired_identity.clear();
        self.surface.present_placeholder(self.placeholder.as_ref());
        self.phase = SlotPhase::Idle;
    }

    /// A worker produced `image` for `identity` under the current assignment.
    ///
    /// Stale results are dropped. Matching ones are shown after the
    /// presentation delay, provided the slot still wants them then.
    pub fn on_success(&mut self, image: Bitmap, identity: &str) -> Result<(), SlotError> {
        self.accept_success(image, identity, self.assignment)
    }

    /// A worker failed to produce `identity` under the current assignment.
    ///
    /// The listener hears about every failure, stale or not. Only a failure
    /// for the current assignment moves the slot to [`SlotPhase::Failed`];
    /// the placeholder stays on screen either way.
    pub fn on_failure(&mut self, identity: &str, reason: &str) -> Result<(), SlotError> {
        self.accept_failure(identity, self.assignment, reason)
    }

    pub(crate) fn accept_success(
        &mut self,
        image: Bitmap,
        identity: &str,
        assignment: u64,
    ) -> Result<(), SlotError> {
        let identity = validate_identity(identity, "computed-for identity")?;

        if !self.is_current(identity, assignment) {
            debug!(
                slot = %self.id,
                identity,
                assignment,
                desired = %self.desired_identity,
                current = self.assignment,
                "Discarding stale result"
            );
            return Ok(());
        }

        trace!(
            slot = %self.id,
            identity,
            delay = ?self.presentation_delay,
            "Scheduling presentation"
        );
        self.handle.post_delayed(
            HostMessage::Present {
                slot: self.id,
                assignment,
                identity: identity.to_string(),
                image,
            },
            self.presentation_delay,
        );
        Ok(())
    }

    pub(crate) fn accept_failure(
        &mut self,
        identity: &str,
        assignment: u64,
        reason: &str,
    ) -> Result<(), SlotError> {
        let identity = validate_identity(identity, "computed-for identity")?;

        let current = self.is_current(identity, assignment);
        debug!(slot = %self.id, identity, assignment, current, reason, "Load failed");

        if current {
            self.phase = SlotPhase::Failed;
        }
        self.notify(LoadState::LoadingFailed);
        Ok(())
    }

    /// Show `image` if `identity` is still wanted under the same assignment.
    /// Returns whether it was shown.
    pub(crate) fn present_if_current(
        &mut self,
        identity: &str,
        assignment: u64,
        image: Bitmap,
    ) -> bool {
        if !self.is_current(identity, assignment) {
            debug!(
                slot = %self.id,
                identity,
                assignment,
                desired = %self.desired_identity,
                current = self.assignment,
                "Slot rebound during presentation delay"
            );
            return false;
        }

        self.is_loaded = true;
        self.phase = SlotPhase::Completed;
        self.surface.present(Presentation::CrossFade {
            from: self.placeholder.clone(),
            to: image,
            duration: self.crossfade,
        });
        self.notify(LoadState::LoadingCompleted);
        true
    }

    fn is_current(&self, identity: &str, assignment: u64) -> bool {
        assignment == self.assignment && identity == self.desired_identity
    }

    fn notify(&mut self, state: LoadState) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_state_changed(self.id, state);
        }
    }
}

impl std::fmt::Debug for ImageSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSlot")
            .field("id", &self.id)
            .field("identity", &self.identity())
            .field("assignment", &self.assignment)
            .field("is_loaded", &self.is_loaded)
            .field("phase", &self.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SlotHost;
    use crate::loader::SourceType;
    use crate::testing::{
        recording_listener, test_loader, RecordingSurface, ScriptedFetcher, SurfaceEvent,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    const A: &str = "https://example.com/a.png";
    const B: &str = "https://example.com/b.png";

    fn setup(fetcher: ScriptedFetcher) -> (SlotHost, SlotId, RecordingSurface, BitmapLoader, TempDir) {
        let temp = TempDir::new().unwrap();
        let loader = test_loader(temp.path(), Arc::new(fetcher));
        let surface = RecordingSurface::default();
        let mut host = SlotHost::new();
        let id = host.add_slot(surface.clone());
        (host, id, surface, loader, temp)
    }

    /// Let woken timer tasks post, then apply what they posted.
    async fn settle(host: &mut SlotHost) {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        host.pump();
    }

    #[test]
    fn test_empty_identity_is_rejected() {
        let (mut host, id, surface, loader, _temp) = setup(ScriptedFetcher::new());

        assert_eq!(
            host.request(id, "", &loader),
            Err(SlotError::InvalidIdentity("identity"))
        );

        let slot = host.slot(id).unwrap();
        assert_eq!(slot.identity(), None);
        assert_eq!(slot.phase(), SlotPhase::Idle);
        assert!(surface.events().is_empty());
    }

    #[tokio::test]
    async fn test_memory_hit_presents_immediately() {
        let (mut host, id, surface, loader, _temp) = setup(ScriptedFetcher::new());
        let image = Bitmap::solid(2, 2, [9, 9, 9, 255]);
        loader.memory_cache().put(A, image.clone());

        let (listener, states) = recording_listener();
        host.slot_mut(id).unwrap().set_state_change_listener(listener);

        let outcome = host.request(id, A, &loader).unwrap();

        assert_eq!(outcome, RequestOutcome::MemoryHit);
        let slot = host.slot(id).unwrap();
        assert!(slot.is_loaded());
        assert_eq!(slot.phase(), SlotPhase::Completed);
        assert!(slot.current_request().is_none());
        assert_eq!(
            surface.events(),
            vec![SurfaceEvent::Present(Presentation::Immediate(image))]
        );
        assert_eq!(*states.lock(), vec![LoadState::LoadingCompleted]);
        assert_eq!(loader.network_pool().submitted(), 0);
    }

    #[tokio::test]
    async fn test_same_identity_is_idempotent() {
        let (mut host, id, surface, loader, _temp) = setup(ScriptedFetcher::new().hang(A));

        assert_eq!(
            host.request(id, A, &loader).unwrap(),
            RequestOutcome::Dispatched(SourceType::Network)
        );
        let events = surface.events().len();

        assert_eq!(host.request(id, A, &loader).unwrap(), RequestOutcome::Unchanged);
        assert_eq!(loader.network_pool().submitted(), 1);
        assert_eq!(surface.events().len(), events);
    }

    #[tokio::test]
    async fn test_miss_shows_placeholder_and_notifies_started() {
        let (mut host, id, surface, loader, _temp) = setup(ScriptedFetcher::new().hang(A));
        let placeholder = Bitmap::solid(1, 1, [0, 0, 0, 255]);
        let (listener, states) = recording_listener();
        {
            let slot = host.slot_mut(id).unwrap();
            slot.set_placeholder(Some(placeholder.clone()));
            slot.set_state_change_listener(listener);
        }

        host.request(id, A, &loader).unwrap();

        let slot = host.slot(id).unwrap();
        assert_eq!(slot.identity(), Some(A));
        assert_eq!(slot.phase(), SlotPhase::Dispatched);
        assert!(!slot.is_loaded());
        assert!(slot.current_request().is_some());
        assert_eq!(
            surface.events().last(),
            Some(&SurfaceEvent::Placeholder(Some(placeholder)))
        );
        assert_eq!(*states.lock(), vec![LoadState::LoadingStarted]);
    }

    #[tokio::test]
    async fn test_new_identity_cancels_previous_request() {
        let (mut host, id, _surface, loader, _temp) =
            setup(ScriptedFetcher::new().hang(A).hang(B));

        host.request(id, A, &loader).unwrap();
        let first = host
            .slot(id)
            .and_then(|slot| slot.current_request())
            .and_then(|weak| weak.upgrade())
            .unwrap();

        host.request(id, B, &loader).unwrap();

        assert!(first.is_cancelled());
        assert_eq!(host.slot(id).unwrap().identity(), Some(B));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_presents_after_delay() {
        let (mut host, id, surface, loader, _temp) = setup(ScriptedFetcher::new().hang(A));
        let (listener, states) = recording_listener();
        host.slot_mut(id).unwrap().set_state_change_listener(listener);
        host.request(id, A, &loader).unwrap();

        let image = Bitmap::solid(3, 3, [1, 2, 3, 255]);
        host.gate(id).unwrap().on_success(image.clone(), A).unwrap();
        host.pump();

        tokio::time::sleep(Duration::from_millis(299)).await;
        host.pump();
        assert!(!host.slot(id).unwrap().is_loaded());

        tokio::time::sleep(Duration::from_millis(1)).await;
        settle(&mut host).await;

        let slot = host.slot(id).unwrap();
        assert!(slot.is_loaded());
        assert_eq!(slot.phase(), SlotPhase::Completed);
        assert_eq!(
            surface.events().last(),
            Some(&SurfaceEvent::Present(Presentation::CrossFade {
                from: None,
                to: image,
                duration: DEFAULT_CROSSFADE,
            }))
        );
        assert_eq!(
            *states.lock(),
            vec![LoadState::LoadingStarted, LoadState::LoadingCompleted]
        );
    }

    #[tokio::test]
    async fn test_stale_success_is_dropped() {
        let (mut host, id, surface, loader, _temp) =
            setup(ScriptedFetcher::new().hang(A).hang(B));
        host.slot_mut(id).unwrap().set_presentation_delay(Duration::ZERO);
        host.request(id, A, &loader).unwrap();
        host.request(id, B, &loader).unwrap();
        let events = surface.events().len();

        let gate = host.gate(id).unwrap();
        gate.on_success(Bitmap::solid(1, 1, [1, 1, 1, 255]), A).unwrap();
        host.pump();

        let slot = host.slot(id).unwrap();
        assert!(!slot.is_loaded());
        assert_eq!(slot.phase(), SlotPhase::Dispatched);
        assert_eq!(surface.events().len(), events);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identity_change_during_delay_drops_image() {
        let (mut host, id, surface, loader, _temp) =
            setup(ScriptedFetcher::new().hang(A).hang(B));
        let (listener, states) = recording_listener();
        host.slot_mut(id).unwrap().set_state_change_listener(listener);
        host.request(id, A, &loader).unwrap();

        host.gate(id)
            .unwrap()
            .on_success(Bitmap::solid(1, 1, [1, 1, 1, 255]), A)
            .unwrap();
        host.pump();

        host.request(id, B, &loader).unwrap();
        let events = surface.events().len();

        tokio::time::sleep(DEFAULT_PRESENTATION_DELAY).await;
        settle(&mut host).await;

        let slot = host.slot(id).unwrap();
        assert!(!slot.is_loaded());
        assert_eq!(slot.identity(), Some(B));
        assert_eq!(surface.events().len(), events);
        assert!(!states.lock().contains(&LoadState::LoadingCompleted));
    }

    #[tokio::test]
    async fn test_stale_failure_still_notifies() {
        let (mut host, id, _surface, loader, _temp) =
            setup(ScriptedFetcher::new().hang(A).hang(B));
        let (listener, states) = recording_listener();
        host.slot_mut(id).unwrap().set_state_change_listener(listener);
        host.request(id, A, &loader).unwrap();
        host.request(id, B, &loader).unwrap();

        host.gate(id).unwrap().on_failure(A, "404").unwrap();
        host.pump();

        assert_eq!(host.slot(id).unwrap().phase(), SlotPhase::Dispatched);
        assert_eq!(states.lock().last(), Some(&LoadState::LoadingFailed));
    }

    #[tokio::test]
    async fn test_current_failure_keeps_placeholder() {
        let (mut host, id, surface, loader, _temp) = setup(ScriptedFetcher::new().hang(A));
        host.request(id, A, &loader).unwrap();
        let events = surface.events().len();

        host.gate(id).unwrap().on_failure(A, "404").unwrap();
        host.pump();

        let slot = host.slot(id).unwrap();
        assert_eq!(slot.phase(), SlotPhase::Failed);
        assert!(!slot.is_loaded());
        assert_eq!(surface.events().len(), events);
    }

    #[test]
    fn test_set_placeholder_skipped_when_loaded() {
        let (mut host, id, surface, _loader, _temp) = setup(ScriptedFetcher::new());
        let slot = host.slot_mut(id).unwrap();

        slot.set_placeholder(Some(Bitmap::solid(1, 1, [0, 0, 0, 255])));
        assert_eq!(surface.events().len(), 1);

        slot.is_loaded = true;
        slot.set_placeholder(None);
        assert_eq!(surface.events().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_returns_to_idle() {
        let (mut host, id, surface, loader, _temp) = setup(ScriptedFetcher::new().hang(A));
        host.request(id, A, &loader).unwrap();

        let slot = host.slot_mut(id).unwrap();
        slot.clear();

        assert_eq!(slot.identity(), None);
        assert_eq!(slot.phase(), SlotPhase::Idle);
        assert!(slot.current_request().is_none());
        assert_eq!(surface.events().last(), Some(&SurfaceEvent::Placeholder(None)));
    }

    fn presents(surface: &RecordingSurface) -> Vec<Presentation> {
        surface
            .events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Present(presentation) => Some(presentation),
                SurfaceEvent::Placeholder(_) => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_assignment_bumps_on_rebind_and_clear() {
        let (mut host, id, _surface, loader, _temp) =
            setup(ScriptedFetcher::new().hang(A).hang(B));
        assert_eq!(host.slot(id).unwrap().assignment(), 0);

        host.request(id, A, &loader).unwrap();
        assert_eq!(host.slot(id).unwrap().assignment(), 1);
        assert_eq!(host.gate(id).unwrap().assignment(), 1);

        host.request(id, A, &loader).unwrap();
        assert_eq!(host.slot(id).unwrap().assignment(), 1);

        host.request(id, B, &loader).unwrap();
        host.slot_mut(id).unwrap().clear();
        assert_eq!(host.slot(id).unwrap().assignment(), 3);
    }

    #[tokio::test]
    async fn test_return_to_identity_ignores_earlier_presentation() {
        let image = Bitmap::solid(2, 2, [4, 5, 6, 255]);
        let fetcher = ScriptedFetcher::new()
            .respond(A, crate::bitmap::encode_png(&image))
            .hang(B);
        let (mut host, id, surface, loader, _temp) = setup(fetcher);
        let (listener, states) = recording_listener();
        host.slot_mut(id).unwrap().set_state_change_listener(listener);

        assert_eq!(
            host.request(id, A, &loader).unwrap(),
            RequestOutcome::Dispatched(SourceType::Network)
        );
        // Apply A's result; its presentation is now waiting out the delay.
        host.turn().await;

        host.request(id, B, &loader).unwrap();
        assert_eq!(
            host.request(id, A, &loader).unwrap(),
            RequestOutcome::MemoryHit
        );
        host.run_for(DEFAULT_PRESENTATION_DELAY * 2).await;

        let shown = presents(&surface);
        assert_eq!(shown.len(), 1);
        assert!(matches!(shown[0], Presentation::Immediate(_)));
        assert_eq!(
            *states.lock(),
            vec![
                LoadState::LoadingStarted,
                LoadState::LoadingStarted,
                LoadState::LoadingCompleted,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_from_earlier_assignment_of_same_identity_is_dropped() {
        let (mut host, id, surface, loader, _temp) =
            setup(ScriptedFetcher::new().hang(A).hang(B));
        let (listener, states) = recording_listener();
        host.slot_mut(id).unwrap().set_state_change_listener(listener);

        host.request(id, A, &loader).unwrap();
        let first = host.gate(id).unwrap();
        host.request(id, B, &loader).unwrap();
        host.request(id, A, &loader).unwrap();
        let second = host.gate(id).unwrap();

        first
            .on_success(Bitmap::solid(1, 1, [1, 0, 0, 255]), A)
            .unwrap();
        host.pump();
        tokio::time::sleep(DEFAULT_PRESENTATION_DELAY).await;
        settle(&mut host).await;

        let slot = host.slot(id).unwrap();
        assert!(!slot.is_loaded());
        assert_eq!(slot.phase(), SlotPhase::Dispatched);
        assert!(presents(&surface).is_empty());

        let image = Bitmap::solid(1, 1, [0, 1, 0, 255]);
        second.on_success(image.clone(), A).unwrap();
        host.pump();
        tokio::time::sleep(DEFAULT_PRESENTATION_DELAY).await;
        settle(&mut host).await;

        assert!(host.slot(id).unwrap().is_loaded());
        let shown = presents(&surface);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].target(), &image);
        assert_eq!(
            states
                .lock()
                .iter()
                .filter(|s| **s == LoadState::LoadingCompleted)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_failure_from_earlier_assignment_notifies_without_failing() {
        let (mut host, id, _surface, loader, _temp) =
            setup(ScriptedFetcher::new().hang(A).hang(B));
        let (listener, states) = recording_listener();
        host.slot_mut(id).unwrap().set_state_change_listener(listener);

        host.request(id, A, &loader).unwrap();
        let first = host.gate(id).unwrap();
        host.request(id, B, &loader).unwrap();
        host.request(id, A, &loader).unwrap();

        first.on_failure(A, "timeout").unwrap();
        host.pump();

        assert_eq!(host.slot(id).unwrap().phase(), SlotPhase::Dispatched);
        assert_eq!(states.lock().last(), Some(&LoadState::LoadingFailed));
    }

    #[test]
    fn test_pump_presents_without_runtime_when_delay_is_zero() {
        let (mut host, id, surface, _loader, _temp) = setup(ScriptedFetcher::new());
        let slot = host.slot_mut(id).unwrap();
        slot.set_presentation_delay(Duration::ZERO);
        slot.desired_identity = A.to_string();
        slot.assignment = 1;

        let image = Bitmap::solid(1, 1, [7, 7, 7, 255]);
        host.gate(id).unwrap().on_success(image.clone(), A).unwrap();

        assert_eq!(host.pump(), 2);
        assert!(host.slot(id).unwrap().is_loaded());
        assert_eq!(presents(&surface).len(), 1);
        assert_eq!(presents(&surface)[0].target(), &image);
    }
}
