//! IPC protocol between the page and the window shell.
//!
//! Application calls go over HTTP (`window.api`). This channel only carries
//! window-level requests that the HTTP server cannot serve:
//! - **JS -> Rust**: `window.localflare.ipc.send(kind, payload)`, which
//!   triggers the `ipc_handler` registered on the WebView.
//! - **Rust -> JS**: `webview.evaluate_script("...")`.

use serde::{Deserialize, Serialize};

/// IPC kind posted by the page once the user confirmed closing the window.
pub const CLOSE_CONFIRMED: &str = "close_confirmed";

/// A typed IPC message from JavaScript to Rust.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    /// The message type / command name.
    pub kind: String,
    /// The message payload (arbitrary JSON, `null` when absent).
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl IpcMessage {
    /// Parse an IPC message from a raw JSON string (from JS postMessage).
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// JavaScript snippet that sets up the IPC bridge on the JS side.
/// Injected as an initialization script into the WebView.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    window.localflare = window.localflare || {};
    window.localflare.ipc = {
        send: function(kind, payload) {
            window.ipc.postMessage(JSON.stringify({
                kind: kind,
                payload: payload === undefined ? null : payload
            }));
        }
    };
})();
"#;

/// Initialization script that disables text selection when the window is
/// configured with `text_select = false`.
pub const NO_TEXT_SELECT_SCRIPT: &str = r#"
document.addEventListener('DOMContentLoaded', function() {
    var style = document.createElement('style');
    style.textContent = '*:not(input):not(textarea) { -webkit-user-select: none; user-select: none; }';
    document.head.appendChild(style);
});
"#;

/// Generate a JS snippet that asks the user to confirm closing and, if
/// they accept, posts `close_confirmed` back over IPC.
pub fn js_confirm_close(message: &str) -> String {
    let message = serde_json::to_string(message).unwrap_or_else(|_| "\"\"".to_string());
    let kind = serde_json::to_string(CLOSE_CONFIRMED).unwrap_or_else(|_| "\"\"".to_string());
    format!("if (window.confirm({message})) {{ window.localflare.ipc.send({kind}); }}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_close_confirmed() {
        let msg = IpcMessage::from_json(r#"{"kind":"close_confirmed","payload":null}"#).unwrap();
        assert_eq!(msg.kind, CLOSE_CONFIRMED);
        assert!(msg.payload.is_null());
    }

    #[test]
    fn payload_is_optional() {
        let msg = IpcMessage::from_json(r#"{"kind":"close_confirmed"}"#).unwrap();
        assert!(msg.payload.is_null());
    }

    #[test]
    fn structured_payload_is_kept() {
        let msg = IpcMessage::from_json(r#"{"kind":"k","payload":{"a":1}}"#).unwrap();
        assert_eq!(msg.payload["a"], 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(IpcMessage::from_json("not json").is_none());
        assert!(IpcMessage::from_json(r#"{"payload":1}"#).is_none());
    }

    #[test]
    fn confirm_close_script_quotes_message() {
        let js = js_confirm_close("Really \"quit\"?");
        assert_eq!(
            js,
            r#"if (window.confirm("Really \"quit\"?")) { window.localflare.ipc.send("close_confirmed"); }"#
        );
    }

    #[test]
    fn init_script_defines_send() {
        assert!(IPC_INIT_SCRIPT.contains("window.localflare.ipc"));
        assert!(IPC_INIT_SCRIPT.contains("window.ipc.postMessage"));
    }
}
