//! Screen-space transform derived from the viewer state.
//!
//! The shell draws content scaled by `zoom` around the viewport center and
//! shifted by the pan offset. These helpers are the single place that math lives.

use super::state::OpenView;

/// Represents pan/zoom transform state as the renderer consumes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Scale factor (1.0 = 100%)
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Transform {
    /// Create a new transform with the given zoom and pan.
    pub fn new(zoom: f32, pan_x: f32, pan_y: f32) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Create an identity transform (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Transform for an open view; zoom percentages become scale factors.
    pub fn from_view(view: &OpenView) -> Self {
        Self::new(
            view.zoom as f32 / 100.0,
            view.pan_x as f32,
            view.pan_y as f32,
        )
    }

    /// Convert a screen point to content coordinates relative to the content center.
    pub fn screen_to_content(&self, screen: (f32, f32), viewport_center: (f32, f32)) -> (f32, f32) {
        let rel_x = screen.0 - viewport_center.0;
        let rel_y = screen.1 - viewport_center.1;
        ((rel_x - self.pan_x) / self.zoom, (rel_y - self.pan_y) / self.zoom)
    }

    /// Inverse of [`Transform::screen_to_content`].
    pub fn content_to_screen(&self, content: (f32, f32), viewport_center: (f32, f32)) -> (f32, f32) {
        (
            content.0 * self.zoom + self.pan_x + viewport_center.0,
            content.1 * self.zoom + self.pan_y + viewport_center.1,
        )
    }

    /// CSS `transform` value for web shells.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.pan_x, self.pan_y, self.zoom
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::RenderKind;
    use crate::viewer::state::{DragAnchor, InteractionLimits};

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        assert_eq!(t.zoom, 1.0);
        assert_eq!(t.pan_x, 0.0);
        assert_eq!(t.pan_y, 0.0);
    }

    #[test]
    fn test_from_view() {
        let mut view = OpenView::new(RenderKind::Image, "blob:docview/1", &InteractionLimits::default());
        view.zoom = 175;
        view.pan_x = -40;
        view.pan_y = 12;
        view.drag = Some(DragAnchor {
            origin_x: 0.0,
            origin_y: 0.0,
        });

        let t = Transform::from_view(&view);
        assert!(approx_eq(t.zoom, 1.75));
        assert_eq!((t.pan_x, t.pan_y), (-40.0, 12.0));
    }

    #[test]
    fn test_screen_content_roundtrip_point() {
        let t = Transform::new(2.0, 30.0, -10.0);
        let center = (200.0, 150.0);

        let content = t.screen_to_content((250.0, 100.0), center);
        assert!(approx_eq(content.0, 10.0));
        assert!(approx_eq(content.1, -20.0));

        let screen = t.content_to_screen(content, center);
        assert!(approx_eq(screen.0, 250.0));
        assert!(approx_eq(screen.1, 100.0));
    }

    #[test]
    fn test_center_maps_to_pan_offset() {
        let t = Transform::new(1.5, 20.0, 20.0);
        let content = t.screen_to_content((120.0, 120.0), (100.0, 100.0));
        assert!(approx_eq(content.0, 0.0));
        assert!(approx_eq(content.1, 0.0));
    }

    #[test]
    fn test_css() {
        assert_eq!(
            Transform::new(1.25, 10.0, -5.0).to_css(),
            "translate(10px, -5px) scale(1.25)"
        );
    }
}
