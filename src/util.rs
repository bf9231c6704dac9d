// Browser helpers shared by services and components.
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

pub fn local_storage() -> Result<web_sys::Storage, ClientError> {
    let win = web_sys::window().ok_or(ClientError::MissingWindow)?;
    match win.local_storage() {
        Ok(Some(store)) => Ok(store),
        Ok(None) => Err(ClientError::Storage("localStorage disabled".into())),
        Err(e) => Err(ClientError::Storage(format!("{e:?}"))),
    }
}

/// `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned>(key: &str) -> Result<Option<T>, ClientError> {
    let store = local_storage()?;
    let raw = store
        .get_item(key)
        .map_err(|e| ClientError::Storage(format!("{e:?}")))?;
    match raw {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(key: &str, value: &T) -> Result<(), ClientError> {
    let s = serde_json::to_string(value)?;
    local_storage()?
        .set_item(key, &s)
        .map_err(|e| ClientError::Storage(format!("{e:?}")))
}

pub fn remove_key(key: &str) -> Result<(), ClientError> {
    local_storage()?
        .remove_item(key)
        .map_err(|e| ClientError::Storage(format!("{e:?}")))
}

/// Vertical scroll offset of the page, 0 when unavailable.
pub fn window_scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

pub fn scroll_to_origin_smooth() {
    if let Some(win) = web_sys::window() {
        let opts = web_sys::ScrollToOptions::new();
        opts.set_top(0.0);
        opts.set_behavior(web_sys::ScrollBehavior::Smooth);
        win.scroll_to_with_scroll_to_options(&opts);
    }
}

pub fn input_value(e: &web_sys::Event) -> String {
    use wasm_bindgen::JsCast;
    e.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|i| i.value())
        .unwrap_or_default()
}

pub fn select_value(e: &web_sys::Event) -> String {
    use wasm_bindgen::JsCast;
    e.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
        .map(|s| s.value())
        .unwrap_or_default()
}
