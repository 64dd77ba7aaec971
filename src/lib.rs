//! docview - document retrieval and interactive viewer core
//!
//! Fetches case documents from authenticated endpoints, decides how they can be
//! rendered, owns the local resource handles for binary payloads and models
//! pan/zoom interaction as a pure reducer. Shells (desktop, browser, headless)
//! draw what [`DocumentViewer::render`] describes.

pub mod classify;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod fetch;
pub mod keybindings;
pub mod lifecycle;
pub mod viewer;

#[cfg(test)]
mod test_support;

pub use classify::{ClassifiedDocument, ContentClassifier, ContentSource, RenderKind, TransformPolicy};
pub use config::{ConfigError, LogLevel, ViewerConfig};
pub use credentials::{Credentials, EnvCredentials, SessionCredentialProvider, StaticCredentials};
pub use fetch::{
    DocumentFetcher, DocumentReference, Endpoint, FailureKind, FetchFailure, FetchResult,
    ReqwestTransport, RequestMethod, Transport,
};
pub use keybindings::{KeyCode, ViewerKeyBindings};
#[cfg(not(target_arch = "wasm32"))]
pub use lifecycle::ThreadTimer;
pub use lifecycle::{
    FallbackTimer, MemoryResourceStore, ResourceLifecycleManager, ResourceStore, ResourceUrl,
    TickTimer,
};
pub use viewer::{
    DocumentViewer, InteractionLimits, OpenOutcome, RenderView, ViewerEvent, ViewerState,
};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
