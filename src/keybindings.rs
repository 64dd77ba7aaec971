//! Customizable keyboard shortcuts for the viewer.
//!
//! Shells translate their native key events into [`KeyCode`] and forward them;
//! the bindings decide which viewer event, if any, a key produces.

use serde::{Deserialize, Serialize};

use crate::viewer::ViewerEvent;

/// Keys the viewer can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Plus,
    Equal,
    Minus,
    Key0,
    R,
    Escape,
    Space,
    /// Any key the viewer does not know about
    Other,
}

/// Action a key can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Close,
}

impl ViewerAction {
    pub fn event(&self) -> ViewerEvent {
        match self {
            ViewerAction::ZoomIn => ViewerEvent::ZoomIn,
            ViewerAction::ZoomOut => ViewerEvent::ZoomOut,
            ViewerAction::ResetZoom => ViewerEvent::ResetZoom,
            ViewerAction::Close => ViewerEvent::Close,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewerAction::ZoomIn => "Zoom in",
            ViewerAction::ZoomOut => "Zoom out",
            ViewerAction::ResetZoom => "Reset zoom",
            ViewerAction::Close => "Close viewer",
        }
    }
}

/// Keybinding configuration for the viewer.
///
/// Each action may have several keys (`+` and `=` share a physical key on
/// most layouts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerKeyBindings {
    #[serde(default)]
    pub zoom_in: Vec<KeyCode>,
    #[serde(default)]
    pub zoom_out: Vec<KeyCode>,
    #[serde(default)]
    pub reset_zoom: Vec<KeyCode>,
    #[serde(default)]
    pub close: Vec<KeyCode>,
}

impl Default for ViewerKeyBindings {
    fn default() -> Self {
        Self {
            zoom_in: vec![KeyCode::Plus, KeyCode::Equal],
            zoom_out: vec![KeyCode::Minus],
            reset_zoom: vec![KeyCode::Key0],
            close: vec![KeyCode::Escape],
        }
    }
}

impl ViewerKeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    fn bindings(&self) -> [(ViewerAction, &[KeyCode]); 4] {
        [
            (ViewerAction::ZoomIn, self.zoom_in.as_slice()),
            (ViewerAction::ZoomOut, self.zoom_out.as_slice()),
            (ViewerAction::ResetZoom, self.reset_zoom.as_slice()),
            (ViewerAction::Close, self.close.as_slice()),
        ]
    }

    /// Get the action that corresponds to a key press, if any.
    pub fn action_for_key(&self, key: KeyCode) -> Option<ViewerAction> {
        if key == KeyCode::Other {
            return None;
        }
        self.bindings()
            .into_iter()
            .find(|(_, keys)| keys.contains(&key))
            .map(|(action, _)| action)
    }

    /// Get the viewer event for a key press, if any.
    pub fn event_for_key(&self, key: KeyCode) -> Option<ViewerEvent> {
        self.action_for_key(key).map(|action| action.event())
    }

    /// Check if a key is bound to more than one action.
    /// Returns a description of the conflict, if any.
    pub fn key_conflict(&self) -> Option<String> {
        let bindings = self.bindings();
        for (i, (action, keys)) in bindings.iter().enumerate() {
            for key in keys.iter() {
                if let Some((other, _)) = bindings[i + 1..].iter().find(|(_, k)| k.contains(key)) {
                    return Some(format!(
                        "'{}' is bound to both {} and {}",
                        key_to_string(*key),
                        action.name(),
                        other.name()
                    ));
                }
            }
        }
        None
    }
}

/// Convert a KeyCode to a display string.
pub fn key_to_string(key: KeyCode) -> &'static str {
    match key {
        KeyCode::Plus => "+",
        KeyCode::Equal => "=",
        KeyCode::Minus => "-",
        KeyCode::Key0 => "0",
        KeyCode::R => "R",
        KeyCode::Escape => "Esc",
        KeyCode::Space => "Space",
        KeyCode::Other => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = ViewerKeyBindings::new();
        assert_eq!(bindings.event_for_key(KeyCode::Plus), Some(ViewerEvent::ZoomIn));
        assert_eq!(bindings.event_for_key(KeyCode::Equal), Some(ViewerEvent::ZoomIn));
        assert_eq!(bindings.event_for_key(KeyCode::Minus), Some(ViewerEvent::ZoomOut));
        assert_eq!(bindings.event_for_key(KeyCode::Key0), Some(ViewerEvent::ResetZoom));
        assert_eq!(bindings.event_for_key(KeyCode::Escape), Some(ViewerEvent::Close));
        assert_eq!(bindings.event_for_key(KeyCode::Space), None);
        assert_eq!(bindings.event_for_key(KeyCode::Other), None);
    }

    #[test]
    fn test_rebinding() {
        let bindings = ViewerKeyBindings {
            reset_zoom: vec![KeyCode::R],
            ..ViewerKeyBindings::default()
        };
        assert_eq!(bindings.action_for_key(KeyCode::R), Some(ViewerAction::ResetZoom));
        assert_eq!(bindings.action_for_key(KeyCode::Key0), None);
    }

    #[test]
    fn test_no_conflict_by_default() {
        assert_eq!(ViewerKeyBindings::default().key_conflict(), None);
    }

    #[test]
    fn test_conflict_detected() {
        let bindings = ViewerKeyBindings {
            close: vec![KeyCode::Escape, KeyCode::Minus],
            ..ViewerKeyBindings::default()
        };
        let conflict = bindings.key_conflict().unwrap();
        assert!(conflict.contains("Zoom out"));
        assert!(conflict.contains("Close viewer"));
    }

    #[test]
    fn test_serde_roundtrip_keeps_bindings() {
        let json = serde_json::to_string(&ViewerKeyBindings::default()).unwrap();
        let parsed: ViewerKeyBindings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ViewerKeyBindings::default());
    }
}
