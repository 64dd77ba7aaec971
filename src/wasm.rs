//! Browser entry point and browser-backed resource handles.

use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Url};

use crate::lifecycle::{FallbackTimer, ResourceStore, ResourceUrl, StoreError, TimerGuard, TimerTask};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::log_1(&format!("Logger already initialized: {}", e).into());
    }
    log::info!("docview core loaded");
}

/// Resource store handing out `blob:` object URLs.
///
/// Revoking lets the browser free the blob; the page must not use the URL afterwards.
/// Pair it with [`BrowserTimer`] so abandoned URLs are revoked without the host
/// having to drive a [`TickTimer`](crate::lifecycle::TickTimer).
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectUrlStore;

impl ResourceStore for ObjectUrlStore {
    fn create(&self, data: &[u8], mime: &str) -> Result<ResourceUrl, StoreError> {
        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(data));

        let options = BlobPropertyBag::new();
        options.set_type(mime);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| StoreError::Create(format!("Blob construction failed: {:?}", e)))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|e| StoreError::Create(format!("createObjectURL failed: {:?}", e)))?;
        Ok(ResourceUrl::new(url))
    }

    fn revoke(&self, url: &ResourceUrl) {
        if let Err(e) = Url::revoke_object_url(url.as_str()) {
            log::error!("revokeObjectURL({}) failed: {:?}", url, e);
        }
    }
}

/// Fallback timer backed by `window.setTimeout`.
///
/// Canceling clears the timeout. The callback of a canceled timeout is never
/// invoked, so its closure (the task and its captured handles) is not freed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

impl FallbackTimer for BrowserTimer {
    fn schedule(&self, after: Duration, task: TimerTask) -> TimerGuard {
        let Some(window) = web_sys::window() else {
            log::error!("No window object; fallback release disabled");
            return TimerGuard::inert();
        };

        let callback = Closure::once_into_js(move || task());
        let delay_ms = i32::try_from(after.as_millis()).unwrap_or(i32::MAX);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms,
        ) {
            Ok(handle) => TimerGuard::new(move || {
                if let Some(window) = web_sys::window() {
                    window.clear_timeout_with_handle(handle);
                }
            }),
            Err(e) => {
                log::error!("setTimeout failed: {:?}", e);
                TimerGuard::inert()
            }
        }
    }
}
