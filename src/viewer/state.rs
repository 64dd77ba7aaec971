//! Zoom/pan/drag state and its transitions.
//!
//! Transitions are a pure reducer: `ViewerState::apply` takes the old state
//! and an event and returns the new state. Nothing here touches resources,
//! logs, or renders, so every rule can be tested without a shell.

use serde::{Deserialize, Serialize};

use crate::classify::RenderKind;
use crate::constants::{pan, zoom};

/// Bounds and steps of the interaction model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionLimits {
    /// Zoom a document opens at. Panning is only possible above it.
    #[serde(default = "default_zoom")]
    pub default_zoom: i32,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: i32,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: i32,
    /// Zoom change per zoom button press
    #[serde(default = "default_button_step")]
    pub button_step: i32,
    /// Zoom change per wheel notch
    #[serde(default = "default_wheel_step")]
    pub wheel_step: i32,
    /// Maximum pan offset on either axis
    #[serde(default = "default_max_pan")]
    pub max_pan: i32,
    /// Multiplier applied to pointer deltas while dragging
    #[serde(default = "default_drag_dampening")]
    pub drag_dampening: f64,
    /// Reset pan once zooming out reaches `default_zoom` or below
    #[serde(default)]
    pub reset_pan_at_unit_zoom: bool,
}

fn default_zoom() -> i32 {
    zoom::DEFAULT
}

fn default_min_zoom() -> i32 {
    zoom::MIN
}

fn default_max_zoom() -> i32 {
    zoom::MAX
}

fn default_button_step() -> i32 {
    zoom::BUTTON_STEP
}

fn default_wheel_step() -> i32 {
    zoom::WHEEL_STEP
}

fn default_max_pan() -> i32 {
    pan::MAX
}

fn default_drag_dampening() -> f64 {
    pan::DRAG_DAMPENING
}

impl Default for InteractionLimits {
    fn default() -> Self {
        Self {
            default_zoom: default_zoom(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            button_step: default_button_step(),
            wheel_step: default_wheel_step(),
            max_pan: default_max_pan(),
            drag_dampening: default_drag_dampening(),
            reset_pan_at_unit_zoom: false,
        }
    }
}

impl InteractionLimits {
    /// Describe the first inconsistency, if any.
    pub fn check(&self) -> Result<(), String> {
        if self.min_zoom <= 0 {
            return Err(format!("min_zoom must be positive, got {}", self.min_zoom));
        }
        if !(self.min_zoom <= self.default_zoom && self.default_zoom <= self.max_zoom) {
            return Err(format!(
                "zoom bounds must satisfy min <= default <= max, got {} <= {} <= {}",
                self.min_zoom, self.default_zoom, self.max_zoom
            ));
        }
        if self.button_step <= 0 || self.wheel_step <= 0 {
            return Err(format!(
                "zoom steps must be positive, got button {} and wheel {}",
                self.button_step, self.wheel_step
            ));
        }
        let span = self.max_zoom - self.min_zoom;
        if self.button_step > span || self.wheel_step > span {
            return Err(format!(
                "zoom steps must not exceed the zoom range {}, got button {} and wheel {}",
                span, self.button_step, self.wheel_step
            ));
        }
        if self.max_pan < 0 {
            return Err(format!("max_pan must not be negative, got {}", self.max_pan));
        }
        if !(self.drag_dampening > 0.0 && self.drag_dampening <= 1.0) {
            return Err(format!(
                "drag_dampening must be in (0, 1], got {}",
                self.drag_dampening
            ));
        }
        Ok(())
    }

    /// Zoom bounds in ascending order, whatever order they were configured in.
    fn zoom_bounds(&self) -> (i32, i32) {
        (
            self.min_zoom.min(self.max_zoom),
            self.min_zoom.max(self.max_zoom),
        )
    }

    /// Pan bound as a non-negative offset.
    fn pan_bound(&self) -> f64 {
        f64::from(self.max_pan.max(0))
    }
}

/// Pointer position minus the pan at drag start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    pub origin_x: f64,
    pub origin_y: f64,
}

/// Input to the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// Show a classified document at `url`
    Open { kind: RenderKind, url: String },
    ZoomIn,
    ZoomOut,
    /// Wheel scroll; negative `delta_y` (scrolling up) zooms in
    Wheel { delta_y: f64 },
    /// Back to default zoom, centered
    ResetZoom,
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    Close,
}

/// A document on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenView {
    pub render_kind: RenderKind,
    pub resource_url: String,
    /// Zoom percentage
    pub zoom: i32,
    pub pan_x: i32,
    pub pan_y: i32,
    pub drag: Option<DragAnchor>,
}

impl OpenView {
    /// Fresh view at default zoom, centered, not dragging.
    pub fn new(render_kind: RenderKind, resource_url: impl Into<String>, limits: &InteractionLimits) -> Self {
        Self {
            render_kind,
            resource_url: resource_url.into(),
            zoom: limits.default_zoom,
            pan_x: 0,
            pan_y: 0,
            drag: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the content is magnified beyond its default size.
    pub fn is_magnified(&self, limits: &InteractionLimits) -> bool {
        self.zoom > limits.default_zoom
    }

    fn zoom_to(&mut self, target: i32, limits: &InteractionLimits) {
        let (min, max) = limits.zoom_bounds();
        self.zoom = target.clamp(min, max);
        if !self.is_magnified(limits) {
            // Anchors only exist while magnified. Pan survives unless configured otherwise.
            self.drag = None;
            if limits.reset_pan_at_unit_zoom {
                self.pan_x = 0;
                self.pan_y = 0;
            }
        }
    }

    fn reduce(mut self, event: &ViewerEvent, limits: &InteractionLimits) -> ViewerState {
        match event {
            ViewerEvent::Open { kind, url } => {
                return ViewerState::Open(OpenView::new(*kind, url.clone(), limits));
            }
            ViewerEvent::Close => return ViewerState::Closed,
            ViewerEvent::ZoomIn => {
                self.zoom_to(self.zoom.saturating_add(limits.button_step), limits)
            }
            ViewerEvent::ZoomOut => {
                self.zoom_to(self.zoom.saturating_sub(limits.button_step), limits)
            }
            ViewerEvent::Wheel { delta_y } => {
                if *delta_y < 0.0 {
                    self.zoom_to(self.zoom.saturating_add(limits.wheel_step), limits);
                } else if *delta_y > 0.0 {
                    self.zoom_to(self.zoom.saturating_sub(limits.wheel_step), limits);
                }
            }
            ViewerEvent::ResetZoom => {
                self.zoom = limits.default_zoom;
                self.pan_x = 0;
                self.pan_y = 0;
                self.drag = None;
            }
            ViewerEvent::PointerDown { x, y } => {
                if self.is_magnified(limits) {
                    self.drag = Some(DragAnchor {
                        origin_x: x - f64::from(self.pan_x),
                        origin_y: y - f64::from(self.pan_y),
                    });
                }
            }
            ViewerEvent::PointerMove { x, y } => {
                if let Some(anchor) = self.drag {
                    self.pan_x = dampened_pan(x - anchor.origin_x, limits);
                    self.pan_y = dampened_pan(y - anchor.origin_y, limits);
                }
            }
            ViewerEvent::PointerUp | ViewerEvent::PointerLeave => self.drag = None,
        }
        ViewerState::Open(self)
    }
}

/// Pointer delta scaled by the dampening factor and clamped to the pan bounds.
fn dampened_pan(delta: f64, limits: &InteractionLimits) -> i32 {
    let max = limits.pan_bound();
    (delta * limits.drag_dampening).clamp(-max, max).round() as i32
}

/// Viewer state: nothing shown, or one document with its interaction state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewerState {
    #[default]
    Closed,
    Open(OpenView),
}

impl ViewerState {
    /// Apply one event and return the resulting state.
    ///
    /// `Open` replaces any state with a fresh view; every other event is a
    /// no-op while closed.
    pub fn apply(self, event: &ViewerEvent, limits: &InteractionLimits) -> ViewerState {
        match self {
            ViewerState::Open(view) => view.reduce(event, limits),
            ViewerState::Closed => match event {
                ViewerEvent::Open { kind, url } => {
                    ViewerState::Open(OpenView::new(*kind, url.clone(), limits))
                }
                _ => ViewerState::Closed,
            },
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ViewerState::Open(_))
    }

    pub fn as_open(&self) -> Option<&OpenView> {
        match self {
            ViewerState::Open(view) => Some(view),
            ViewerState::Closed => None,
        }
    }
}
