//! Interaction sequences through the controller.

use std::sync::Arc;
use std::time::Duration;

use super::Harness;
use crate::classify::TransformPolicy;
use crate::config::{ConfigError, ViewerConfig};
use crate::credentials::StaticCredentials;
use crate::fetch::{DocumentFetcher, DocumentReference};
use crate::keybindings::KeyCode;
use crate::lifecycle::{MemoryResourceStore, ResourceLifecycleManager, TickTimer};
use crate::test_support::{PNG_BYTES, ScriptedTransport, binary_response, json_response};
use crate::viewer::{DocumentViewer, InteractionLimits, Transform, ViewerEvent};

async fn open_image() -> Harness {
    let mut h = Harness::with_responses(vec![binary_response("image/png", PNG_BYTES)]);
    h.viewer.open(DocumentReference::new(1)).await;
    h
}

fn zoom(h: &Harness) -> i32 {
    h.viewer.render().unwrap().zoom_percent
}

#[tokio::test]
async fn test_button_zoom_sequence() {
    let mut h = open_image().await;

    for _ in 0..3 {
        h.viewer.handle(ViewerEvent::ZoomIn);
    }
    assert_eq!(zoom(&h), 175);

    for _ in 0..5 {
        h.viewer.handle(ViewerEvent::ZoomOut);
    }
    assert_eq!(zoom(&h), 50);
}

#[tokio::test]
async fn test_wheel_up_saturates_at_max() {
    let mut h = open_image().await;

    for _ in 0..25 {
        h.viewer.handle(ViewerEvent::Wheel { delta_y: -120.0 });
    }

    assert_eq!(zoom(&h), 300);
}

#[tokio::test]
async fn test_drag_pans_with_dampening() {
    let mut h = open_image().await;
    h.viewer.handle(ViewerEvent::ZoomIn);

    h.viewer.handle(ViewerEvent::PointerDown { x: 100.0, y: 100.0 });
    assert!(h.viewer.render().unwrap().dragging);
    h.viewer.handle(ViewerEvent::PointerMove { x: 200.0, y: 50.0 });
    h.viewer.handle(ViewerEvent::PointerUp);

    let view = h.viewer.render().unwrap();
    assert!(!view.dragging);
    assert_eq!(view.transform, Some(Transform::new(1.25, 70.0, -35.0)));
}

#[tokio::test]
async fn test_drag_ignored_at_default_zoom() {
    let mut h = open_image().await;

    h.viewer.handle(ViewerEvent::PointerDown { x: 100.0, y: 100.0 });
    h.viewer.handle(ViewerEvent::PointerMove { x: 300.0, y: 300.0 });

    let view = h.viewer.render().unwrap();
    assert!(!view.dragging);
    assert_eq!(view.transform, Some(Transform::identity()));
}

#[tokio::test]
async fn test_keyboard_zoom_and_reset() {
    let mut h = open_image().await;

    assert!(h.viewer.handle_key(KeyCode::Plus));
    assert!(h.viewer.handle_key(KeyCode::Equal));
    assert_eq!(zoom(&h), 150);
    assert!(h.viewer.handle_key(KeyCode::Minus));
    assert_eq!(zoom(&h), 125);
    assert!(h.viewer.handle_key(KeyCode::Key0));
    assert_eq!(zoom(&h), 100);
    assert!(!h.viewer.handle_key(KeyCode::Space));
}

#[tokio::test]
async fn test_embedded_transform_follows_policy() {
    let mut h = Harness::with_responses(vec![json_response(
        200,
        serde_json::json!({ "url": "https://files.example/a.pdf" }),
    )])
    .map_viewer(|viewer| {
        viewer.with_policy(TransformPolicy {
            transform_embedded_documents: true,
        })
    });
    h.viewer.open(DocumentReference::new(1)).await;

    h.viewer.handle(ViewerEvent::ZoomIn);

    assert_eq!(
        h.viewer.render().unwrap().transform,
        Some(Transform::new(1.25, 0.0, 0.0))
    );
}

#[tokio::test]
async fn test_events_while_closed_are_ignored() {
    let mut h = Harness::with_responses(vec![]);

    h.viewer.handle(ViewerEvent::ZoomIn);
    h.viewer.handle(ViewerEvent::PointerDown { x: 1.0, y: 1.0 });

    assert!(h.viewer.render().is_none());
}

#[tokio::test]
async fn test_notification_expires_and_dismisses() {
    let mut h = Harness::with_responses(vec![
        json_response(200, serde_json::json!({})),
        json_response(200, serde_json::json!({})),
    ]);

    h.viewer.open(DocumentReference::new(1)).await;
    let created = h.viewer.notification().unwrap().created_at();
    h.viewer.expire_notifications(created + Duration::from_secs(1));
    assert!(h.viewer.notification().is_some());
    h.viewer.expire_notifications(created + Duration::from_secs(8));
    assert!(h.viewer.notification().is_none());

    h.viewer.open(DocumentReference::new(2)).await;
    h.viewer.dismiss_notification();
    assert!(h.viewer.notification().is_none());
}

#[test]
fn test_with_limits_rejects_inconsistent_limits() {
    let h = Harness::with_responses(vec![]);
    let negative_pan = InteractionLimits {
        max_pan: -1,
        ..InteractionLimits::default()
    };

    assert!(h.viewer.with_limits(negative_pan).is_err());
}

#[tokio::test]
async fn test_with_limits_applies_consistent_limits() {
    let limits = InteractionLimits {
        button_step: 50,
        ..InteractionLimits::default()
    };
    let mut h = Harness::with_responses(vec![binary_response("image/png", PNG_BYTES)])
        .map_viewer(|viewer| viewer.with_limits(limits).unwrap());
    h.viewer.open(DocumentReference::new(1)).await;

    h.viewer.handle(ViewerEvent::ZoomIn);

    assert_eq!(zoom(&h), 150);
}

#[test]
fn test_from_config_rejects_oversized_step() {
    let mut config = ViewerConfig::default();
    config.interaction.button_step = i32::MAX;
    let fetcher = DocumentFetcher::new(
        Arc::new(ScriptedTransport::new()),
        config.endpoint.clone(),
    );
    let resources = ResourceLifecycleManager::new(
        Arc::new(MemoryResourceStore::new()),
        Arc::new(TickTimer::new()),
    );

    let result = DocumentViewer::from_config(
        &config,
        fetcher,
        Arc::new(StaticCredentials::new("sess-1", "tok")),
        resources,
    );

    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}
