//! The non-visual half of the viewer.
//!
//! [`DocumentViewer`] owns the reducer state, the live resource handle and the
//! pending fetch. Shells drive it with events and draw whatever
//! [`DocumentViewer::render`] returns.

use std::sync::Arc;
use std::time::Duration;

use web_time::Instant;

use super::notification::Notification;
use super::state::{InteractionLimits, ViewerEvent, ViewerState};
use super::transform::Transform;
use crate::classify::{ContentClassifier, ContentSource, RenderKind, TransformPolicy};
use crate::config::{ConfigError, ViewerConfig};
use crate::constants::lifetime;
use crate::credentials::{Credentials, SessionCredentialProvider};
use crate::fetch::{DocumentFetcher, DocumentReference, FailureKind, FetchFailure, FetchResult};
use crate::keybindings::{KeyCode, ViewerKeyBindings};
use crate::lifecycle::{ResourceLifecycleManager, ResourceUrl};

/// A fetch that has been started but not yet applied.
///
/// Runs without borrowing the viewer, so the viewer keeps handling input (or
/// gets closed) while the request is in flight.
pub struct OpenRequest {
    generation: u64,
    document: DocumentReference,
    credentials: Credentials,
    fetcher: DocumentFetcher,
}

impl OpenRequest {
    pub fn document(&self) -> DocumentReference {
        self.document
    }

    /// Perform the request.
    pub async fn fetch(self) -> FetchedDocument {
        let result = self
            .fetcher
            .fetch_document(self.document.document_id, &self.credentials)
            .await;
        FetchedDocument {
            generation: self.generation,
            document: self.document,
            result,
        }
    }
}

/// Result of an [`OpenRequest`], ready for [`DocumentViewer::finish_open`].
#[derive(Debug)]
pub struct FetchedDocument {
    generation: u64,
    pub document: DocumentReference,
    pub result: FetchResult,
}

/// What [`DocumentViewer::finish_open`] did with a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The viewer now shows the document
    Opened(RenderKind),
    /// The viewer stays closed; a notification explains why
    Failed(FailureKind),
    /// The result arrived after the viewer moved on and was dropped
    Discarded,
}

/// Everything a shell needs to draw the current document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderView {
    pub kind: RenderKind,
    /// Location of the content: a local resource URL or an external link
    pub url: String,
    /// Whether `url` is a local handle owned by the viewer and not yet released
    pub is_local: bool,
    /// Pan/zoom to apply, or `None` if this kind ignores it
    pub transform: Option<Transform>,
    /// Text to show instead of the content
    pub placeholder: Option<&'static str>,
    pub zoom_percent: i32,
    pub dragging: bool,
}

/// Controller for a single document viewer.
pub struct DocumentViewer {
    fetcher: DocumentFetcher,
    credentials: Arc<dyn SessionCredentialProvider>,
    classifier: ContentClassifier,
    resources: ResourceLifecycleManager,
    limits: InteractionLimits,
    policy: TransformPolicy,
    keybindings: ViewerKeyBindings,
    notification_ttl: Duration,

    state: ViewerState,
    /// Local handle backing the open document, if any
    owned: Option<ResourceUrl>,
    document: Option<DocumentReference>,
    /// Bumped on every open and close; fetch results from older generations are dropped
    generation: u64,
    pending: Option<u64>,
    notification: Option<Notification>,
}

impl DocumentViewer {
    pub fn new(
        fetcher: DocumentFetcher,
        credentials: Arc<dyn SessionCredentialProvider>,
        resources: ResourceLifecycleManager,
    ) -> Self {
        Self {
            fetcher,
            credentials,
            classifier: ContentClassifier::new(),
            resources,
            limits: InteractionLimits::default(),
            policy: TransformPolicy::default(),
            keybindings: ViewerKeyBindings::default(),
            notification_ttl: Duration::from_secs(lifetime::NOTIFICATION_TTL_SECS),
            state: ViewerState::Closed,
            owned: None,
            document: None,
            generation: 0,
            pending: None,
            notification: None,
        }
    }

    /// Build a viewer with every tunable taken from `config`.
    ///
    /// The fetcher and resource manager are built by the caller since they
    /// need platform pieces (transport, store, timer); the endpoint and
    /// fallback delay in `config` are expected to have been applied to them.
    pub fn from_config(
        config: &ViewerConfig,
        fetcher: DocumentFetcher,
        credentials: Arc<dyn SessionCredentialProvider>,
        resources: ResourceLifecycleManager,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewer = Self::new(fetcher, credentials, resources)
            .with_limits(config.interaction)
            .map_err(ConfigError::Invalid)?
            .with_policy(config.transform)
            .with_classifier(
                ContentClassifier::new().with_image_sniffing(config.preferences.sniff_image_signatures),
            )
            .with_keybindings(config.keybindings.clone())
            .with_notification_ttl(Duration::from_secs(config.preferences.notification_ttl_secs));
        Ok(viewer)
    }

    /// Replace the interaction limits. Inconsistent limits are rejected.
    pub fn with_limits(mut self, limits: InteractionLimits) -> Result<Self, String> {
        limits.check()?;
        self.limits = limits;
        Ok(self)
    }

    pub fn with_policy(mut self, policy: TransformPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_classifier(mut self, classifier: ContentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_keybindings(mut self, keybindings: ViewerKeyBindings) -> Self {
        self.keybindings = keybindings;
        self
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    // === Opening ===

    /// Start opening a document.
    ///
    /// Whatever was shown is closed first, and any fetch still in flight
    /// becomes stale.
    pub fn begin_open(&mut self, document: DocumentReference) -> OpenRequest {
        self.close();
        self.notification = None;
        self.generation += 1;
        self.pending = Some(self.generation);
        self.document = Some(document);

        log::debug!(
            "Opening document {} (generation {})",
            document.document_id,
            self.generation
        );

        OpenRequest {
            generation: self.generation,
            document,
            credentials: self.credentials.credentials(),
            fetcher: self.fetcher.clone(),
        }
    }

    /// Apply a finished fetch.
    pub fn finish_open(&mut self, fetched: FetchedDocument) -> OpenOutcome {
        if self.pending != Some(fetched.generation) {
            log::debug!(
                "Discarding stale result for document {} (generation {}, current {})",
                fetched.document.document_id,
                fetched.generation,
                self.generation
            );
            return OpenOutcome::Discarded;
        }
        self.pending = None;

        let document_id = fetched.document.document_id;
        let classified = match fetched.result {
            FetchResult::Failure(failure) => return self.fail(document_id, &failure),
            result => match self.classifier.resolve(result) {
                Some(classified) => classified,
                None => return OpenOutcome::Discarded,
            },
        };

        let kind = classified.kind;
        let url = match classified.source {
            ContentSource::External(url) => url,
            ContentSource::Payload { .. } if kind == RenderKind::Unsupported => String::new(),
            ContentSource::Payload { data, mime } => match self.resources.acquire(&data, &mime) {
                Ok(handle) => {
                    let url = handle.as_str().to_string();
                    self.owned = Some(handle);
                    url
                }
                Err(e) => {
                    log::error!("Document {}: {}", document_id, e);
                    let failure = FetchFailure::payload_read(e.to_string());
                    return self.fail(document_id, &failure);
                }
            },
        };

        log::info!("Opened document {} as {}", document_id, kind.name());
        self.apply(ViewerEvent::Open { kind, url });
        OpenOutcome::Opened(kind)
    }

    /// Fetch and open in one step.
    pub async fn open(&mut self, document: DocumentReference) -> OpenOutcome {
        let fetched = self.begin_open(document).fetch().await;
        self.finish_open(fetched)
    }

    fn fail(&mut self, document_id: i64, failure: &FetchFailure) -> OpenOutcome {
        let kind = failure.kind();
        log::info!("Document {} not opened: {}", document_id, failure);
        self.document = None;
        self.notification = Some(Notification::new(
            kind,
            failure.user_message(),
            self.notification_ttl,
        ));
        OpenOutcome::Failed(kind)
    }

    // === Interaction ===

    /// Feed one input event to the viewer.
    pub fn handle(&mut self, event: ViewerEvent) {
        match event {
            ViewerEvent::Close => self.close(),
            ViewerEvent::Open { .. } => {
                log::warn!("Open events are produced by finish_open; ignoring");
            }
            event => self.apply(event),
        }
    }

    /// Handle a key press. Returns whether the key was bound.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.keybindings.event_for_key(key) {
            Some(event) => {
                self.handle(event);
                true
            }
            None => false,
        }
    }

    /// Close the viewer, releasing its resource. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("Closing with a fetch in flight; its result will be discarded");
        }
        if let Some(url) = self.owned.take() {
            self.resources.release(&url);
        }
        if let Some(document) = self.document.take() {
            log::info!("Closed document {}", document.document_id);
        }
        self.state = ViewerState::Closed;
    }

    fn apply(&mut self, event: ViewerEvent) {
        let before = std::mem::take(&mut self.state);
        self.state = before.apply(&event, &self.limits);
        if let ViewerState::Open(view) = &self.state {
            log::debug!(
                "{:?} -> zoom {}%, pan ({}, {}), dragging {}",
                event,
                view.zoom,
                view.pan_x,
                view.pan_y,
                view.is_dragging()
            );
        }
    }

    // === Queries ===

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The document being shown or loaded.
    pub fn document(&self) -> Option<DocumentReference> {
        self.document
    }

    pub fn limits(&self) -> &InteractionLimits {
        &self.limits
    }

    pub fn resources(&self) -> &ResourceLifecycleManager {
        &self.resources
    }

    /// Describe what to draw, or `None` while closed.
    pub fn render(&self) -> Option<RenderView> {
        let view = self.state.as_open()?;
        let kind = view.render_kind;
        Some(RenderView {
            kind,
            url: view.resource_url.clone(),
            is_local: self
                .owned
                .as_ref()
                .is_some_and(|url| self.resources.is_live(url)),
            transform: kind
                .applies_transform(&self.policy)
                .then(|| Transform::from_view(view)),
            placeholder: (kind == RenderKind::Unsupported)
                .then(|| FailureKind::UnsupportedType.user_message()),
            zoom_percent: view.zoom,
            dragging: view.is_dragging(),
        })
    }

    // === Notifications ===

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Drop the notification if it has outlived its display time.
    pub fn expire_notifications(&mut self, now: Instant) {
        if self.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notification = None;
        }
    }
}

impl Drop for DocumentViewer {
    fn drop(&mut self) {
        self.close();
    }
}
