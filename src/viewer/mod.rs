//! Interactive viewer: pan/zoom reducer, transform math and the controller
//! that ties fetching, classification and resource ownership together.

mod controller;
mod notification;
mod state;
mod transform;

pub use controller::{DocumentViewer, FetchedDocument, OpenOutcome, OpenRequest, RenderView};
pub use notification::Notification;
pub use state::{DragAnchor, InteractionLimits, OpenView, ViewerEvent, ViewerState};
pub use transform::Transform;

#[cfg(test)]
mod tests;
