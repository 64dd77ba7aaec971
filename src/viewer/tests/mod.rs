//! Scenario tests for the document viewer.
//!
//! These drive a [`DocumentViewer`](super::DocumentViewer) end to end with a
//! scripted transport, an in-memory store and a manually advanced timer.

mod sequence_tests;

use std::sync::Arc;
use std::time::Duration;

use super::DocumentViewer;
use crate::credentials::StaticCredentials;
use crate::fetch::{DocumentFetcher, Endpoint, RequestMethod, TransportResponse};
use crate::lifecycle::{MemoryResourceStore, ResourceLifecycleManager, TickTimer};
use crate::test_support::ScriptedTransport;

/// A viewer plus handles on its collaborators.
struct Harness {
    viewer: DocumentViewer,
    transport: Arc<ScriptedTransport>,
    store: Arc<MemoryResourceStore>,
    timer: Arc<TickTimer>,
}

impl Harness {
    fn with_responses(responses: Vec<TransportResponse>) -> Self {
        let transport = Arc::new(
            responses
                .into_iter()
                .fold(ScriptedTransport::new(), |t, r| t.respond(r)),
        );
        Self::build(transport, StaticCredentials::new("sess-1", "tok"))
    }

    fn build(transport: Arc<ScriptedTransport>, credentials: StaticCredentials) -> Self {
        let store = Arc::new(MemoryResourceStore::new());
        let timer = Arc::new(TickTimer::new());
        let fetcher = DocumentFetcher::new(
            transport.clone(),
            Endpoint::new("https://claims.example/api/documents/view", RequestMethod::Post),
        );
        let resources = ResourceLifecycleManager::new(store.clone(), timer.clone());
        let viewer = DocumentViewer::new(fetcher, Arc::new(credentials), resources);
        Self {
            viewer,
            transport,
            store,
            timer,
        }
    }

    /// Rebuild the viewer with extra configuration.
    fn map_viewer(self, f: impl FnOnce(DocumentViewer) -> DocumentViewer) -> Self {
        let Harness {
            viewer,
            transport,
            store,
            timer,
        } = self;
        Harness {
            viewer: f(viewer),
            transport,
            store,
            timer,
        }
    }

    fn advance(&self, secs: u64) -> usize {
        self.timer.advance(Duration::from_secs(secs))
    }
}
