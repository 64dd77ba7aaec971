//! Global constants for the document viewer.
//!
//! Zoom values are whole percentages (100 = actual size), pan values are
//! screen pixels.

/// Zoom constants.
pub mod zoom {
    /// Zoom level a freshly opened document starts at
    pub const DEFAULT: i32 = 100;
    /// Minimum zoom level
    pub const MIN: i32 = 50;
    /// Maximum zoom level
    pub const MAX: i32 = 300;
    /// Zoom increment/decrement for the zoom buttons
    pub const BUTTON_STEP: i32 = 25;
    /// Zoom increment/decrement per wheel notch
    pub const WHEEL_STEP: i32 = 10;
}

/// Pan constants.
pub mod pan {
    /// Maximum pan offset on either axis
    pub const MAX: i32 = 200;
    /// Multiplier applied to raw pointer deltas while dragging
    pub const DRAG_DAMPENING: f64 = 0.7;
}

/// Resource lifetime constants.
pub mod lifetime {
    /// Seconds before an unreleased resource is released by the fallback timer
    pub const FALLBACK_RELEASE_SECS: u64 = 30;
    /// Seconds a failure notification stays visible unless dismissed
    pub const NOTIFICATION_TTL_SECS: u64 = 8;
}

/// Wire constants for the document endpoints.
pub mod wire {
    /// Name of the document id in JSON bodies and query strings
    pub const DOCUMENT_ID_PARAM: &str = "document_id";
    /// Header carrying the session identifier
    pub const SESSION_HEADER: &str = "X-Session-Id";
    /// Content type of JSON envelopes
    pub const JSON_MIME: &str = "application/json";
    /// Content type rendered by the embedded document viewer
    pub const PDF_MIME: &str = "application/pdf";
}
