//! Browser globals and dialogs.

use dioxus_logger::tracing::{error, info};
use repo_client::AppConfig;
use wasm_bindgen::JsValue;

/// JSON connection blob set by the hosting page.
pub const CONNECTION_GLOBAL: &str = "__firebase_config";
pub const NAMESPACE_GLOBAL: &str = "__app_id";
pub const CREDENTIAL_GLOBAL: &str = "__initial_auth_token";

/// Read a page global as a string. Objects are stringified as JSON.
pub fn read_global(name: &str) -> Option<String> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(name)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    value.as_string().or_else(|| {
        js_sys::JSON::stringify(&value)
            .ok()
            .and_then(|json| json.as_string())
    })
}

/// Build the startup configuration from the injected globals.
pub fn config_from_globals(
    connection: Option<String>,
    namespace: Option<String>,
    credential: Option<String>,
) -> AppConfig {
    let connection = connection.unwrap_or_else(|| "{}".to_string());
    match AppConfig::from_injected(&connection, namespace.as_deref(), credential.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Ignoring injected configuration: {}", e);
            AppConfig::offline()
        }
    }
}

pub fn load_app_config() -> AppConfig {
    let config = config_from_globals(
        read_global(CONNECTION_GLOBAL),
        read_global(NAMESPACE_GLOBAL),
        read_global(CREDENTIAL_GLOBAL),
    );
    info!(
        "Namespace {}, custom credential: {}",
        config.namespace.as_str(),
        config.initial_credential.is_some()
    );
    config
}

/// Blocking yes/no prompt. A missing window counts as "no".
pub fn browser_confirm(prompt: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(prompt).ok())
        .unwrap_or(false)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_read_global() {
        let window = web_sys::window().unwrap();
        js_sys::Reflect::set(&window, &JsValue::from_str(NAMESPACE_GLOBAL), &JsValue::from_str("ut-test")).unwrap();
        assert_eq!(read_global(NAMESPACE_GLOBAL).as_deref(), Some("ut-test"));
        assert!(read_global("__missing_global").is_none());
    }
}
