//! Collection listeners over WebSocket.
//!
//! One socket per [`Subscription`]. The server pushes a full snapshot
//! frame on connect and after every change; an error frame or a close ends
//! the stream. Dropping the subscription closes the socket.

use dioxus_logger::tracing::{debug, error, info, warn};
use futures::channel::mpsc;
use repo_client::backend::SnapshotResult;
use repo_client::{ClientError, Subscription};
use shared_types::ListenMsg;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

struct ListenRuntime {
    ws: WebSocket,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(ErrorEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl ListenRuntime {
    fn close(self) {
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        let _ = self.ws.close();
    }
}

pub fn http_to_ws_url(http_url: &str) -> String {
    if let Some(rest) = http_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if let Some(rest) = http_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if http_url.is_empty() {
        let protocol = web_sys::window()
            .and_then(|w| w.location().protocol().ok())
            .unwrap_or_else(|| "http:".to_string());
        let host = web_sys::window()
            .and_then(|w| w.location().host().ok())
            .unwrap_or_else(|| "localhost".to_string());

        if protocol == "https:" {
            format!("wss://{host}")
        } else {
            format!("ws://{host}")
        }
    } else {
        format!("ws://{http_url}")
    }
}

pub fn listen_url(endpoint: &str, collection_path: &str, token: Option<&str>) -> String {
    let mut url = format!(
        "{}/v1/listen?path={}",
        http_to_ws_url(endpoint),
        urlencoding::encode(collection_path)
    );
    if let Some(token) = token {
        url.push_str("&token=");
        url.push_str(&urlencoding::encode(token));
    }
    url
}

/// Decode one frame. `None` for frames that are not listen messages.
pub fn parse_listen_message(payload: &str) -> Option<SnapshotResult> {
    match serde_json::from_str::<ListenMsg>(payload) {
        Ok(ListenMsg::Snapshot { documents }) => Some(Ok(documents)),
        Ok(ListenMsg::Error { message }) => Some(Err(ClientError::Subscription(message))),
        Err(e) => {
            warn!("Ignoring unparseable listen frame: {}", e);
            None
        }
    }
}

/// Open a listener on `collection_path`.
pub fn listen(url: &str, collection_path: &str) -> Subscription {
    info!("Opening listener for {}", collection_path);

    let ws = match WebSocket::new(url) {
        Ok(ws) => ws,
        Err(e) => {
            error!("Failed to create WebSocket: {:?}", e);
            return Subscription::failed(
                collection_path,
                ClientError::Transport(format!("Failed to create WebSocket: {e:?}")),
            );
        }
    };

    let (tx, rx) = mpsc::unbounded();

    let tx_message = tx.clone();
    let path_message = collection_path.to_string();
    let on_message = Closure::wrap(Box::new(move |e: MessageEvent| {
        let Ok(text) = e.data().dyn_into::<js_sys::JsString>() else {
            return;
        };
        let text_str = text.as_string().unwrap_or_default();
        let Some(item) = parse_listen_message(&text_str) else {
            return;
        };

        match &item {
            Ok(documents) => debug!("Snapshot for {}: {} documents", path_message, documents.len()),
            Err(e) => error!("Listener error for {}: {}", path_message, e),
        }
        let failed = item.is_err();
        let _ = tx_message.unbounded_send(item);
        if failed {
            tx_message.close_channel();
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

    let tx_error = tx.clone();
    let on_error = Closure::wrap(Box::new(move |e: ErrorEvent| {
        let _ = tx_error.unbounded_send(Err(ClientError::Transport(format!(
            "WebSocket error: {}",
            e.message()
        ))));
    }) as Box<dyn FnMut(ErrorEvent)>);
    ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    let tx_close = tx;
    let path_close = collection_path.to_string();
    let on_close = Closure::wrap(Box::new(move |e: CloseEvent| {
        info!("Listener for {} closed (code {})", path_close, e.code());
        tx_close.close_channel();
    }) as Box<dyn FnMut(CloseEvent)>);
    ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    let runtime = ListenRuntime {
        ws,
        _on_message: on_message,
        _on_error: on_error,
        _on_close: on_close,
    };
    Subscription::new(collection_path, rx, move || runtime.close())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_to_ws_url() {
        assert_eq!(http_to_ws_url("http://localhost:8080"), "ws://localhost:8080");
        assert_eq!(http_to_ws_url("https://db.example.edu"), "wss://db.example.edu");
        assert_eq!(http_to_ws_url("db.example.edu"), "ws://db.example.edu");
    }

    #[test]
    fn test_listen_url() {
        let url = listen_url(
            "https://db.example.edu",
            "artifacts/ut-repo-react-node/public/data/materials",
            Some("a b+c"),
        );
        assert_eq!(
            url,
            "wss://db.example.edu/v1/listen?path=artifacts%2Fut-repo-react-node%2Fpublic%2Fdata%2Fmaterials&token=a%20b%2Bc"
        );

        let anonymous = listen_url("http://localhost:8080", "x/profiles", None);
        assert_eq!(anonymous, "ws://localhost:8080/v1/listen?path=x%2Fprofiles");
    }

    #[test]
    fn test_parse_snapshot_frame() {
        let payload = json!({
            "type": "snapshot",
            "documents": [{"id": "m1", "data": {"title": "Costos"}}]
        })
        .to_string();

        let documents = parse_listen_message(&payload).unwrap().unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "m1");
    }

    #[test]
    fn test_parse_error_frame() {
        let payload = r#"{"type":"error","message":"permission-denied"}"#;
        let result = parse_listen_message(payload).unwrap();
        assert_eq!(
            result,
            Err(ClientError::Subscription("permission-denied".to_string()))
        );
    }

    #[test]
    fn test_parse_unknown_frame() {
        assert!(parse_listen_message(r#"{"type":"pong"}"#).is_none());
        assert!(parse_listen_message("not json").is_none());
    }
}
