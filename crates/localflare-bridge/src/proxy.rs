//! Client call-proxy and its injection into served HTML.
//!
//! Pages call `await window.api.some_type({...})`; the proxy turns every
//! property access into a `POST /api/send` with `type` = property name.

/// Attribute marking an injected proxy block. A page that already carries
/// it is left alone.
const PROXY_MARKER: &str = "data-localflare-proxy";

/// The injected `<script>` block.
const PROXY_SCRIPT: &str = r#"<script data-localflare-proxy>
(function() {
    // LocalFlare call proxy: window.api.<type>(data) -> POST /api/send
    async function send(type, data) {
        try {
            const response = await fetch('/api/send', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ type: type, data: data })
            });
            const body = await response.json();
            if (!body.success) {
                throw new Error(body.error);
            }
            return body.result;
        } catch (error) {
            console.error('LocalFlare call failed:', type, error);
            throw error;
        }
    }

    window.api = new Proxy({}, {
        get: function(target, prop) {
            if (typeof prop === 'symbol') {
                return target[prop];
            }
            return function(data) {
                return send(prop, data || {});
            };
        }
    });
})();
</script>"#;

/// Whether `text` looks like a full HTML document (contains `<html`,
/// case-insensitive).
fn is_html_document(text: &str) -> bool {
    text.to_ascii_lowercase().contains("<html")
}

/// Insert the proxy script into an HTML document.
///
/// The block goes right before the first `</head>`; without one, a
/// `<head>` holding the block is synthesized right before the first
/// `<body`. Tags are matched case-insensitively. Non-HTML text, documents
/// with neither tag, and documents already carrying the proxy are returned
/// unchanged.
pub fn inject_proxy(text: &str) -> String {
    if !is_html_document(text) || text.contains(PROXY_MARKER) {
        return text.to_string();
    }

    let lower = text.to_ascii_lowercase();

    // ASCII lowercasing keeps byte offsets aligned with `text`.
    if let Some(idx) = lower.find("</head>") {
        let mut out = String::with_capacity(text.len() + PROXY_SCRIPT.len());
        out.push_str(&text[..idx]);
        out.push_str(PROXY_SCRIPT);
        out.push_str(&text[idx..]);
        return out;
    }

    if let Some(idx) = lower.find("<body") {
        let mut out = String::with_capacity(text.len() + PROXY_SCRIPT.len() + 13);
        out.push_str(&text[..idx]);
        out.push_str("<head>");
        out.push_str(PROXY_SCRIPT);
        out.push_str("</head>");
        out.push_str(&text[idx..]);
        return out;
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy_count(html: &str) -> usize {
        html.matches(PROXY_MARKER).count()
    }

    #[test]
    fn injects_before_closing_head() {
        let html = "<html><head><title>T</title></head><body></body></html>";
        let out = inject_proxy(html);
        assert_eq!(proxy_count(&out), 1);
        let script_at = out.find(PROXY_MARKER).unwrap();
        let head_close = out.find("</head>").unwrap();
        assert!(script_at < head_close);
        assert!(out.starts_with("<html><head><title>T</title><script"));
        assert!(out.ends_with("</script></head><body></body></html>"));
    }

    #[test]
    fn uppercase_head_gets_exactly_one_block() {
        let html = "<HTML><HEAD><TITLE>T</TITLE></HEAD><BODY></BODY></HTML>";
        let out = inject_proxy(html);
        assert_eq!(proxy_count(&out), 1);
        assert!(out.contains("</script></HEAD>"));
    }

    #[test]
    fn mixed_case_head_gets_exactly_one_block() {
        let html = "<Html>\n  <Head></Head>\n  <Body>hi</Body>\n</Html>";
        let out = inject_proxy(html);
        assert_eq!(proxy_count(&out), 1);
        assert!(out.contains("</script></Head>"));
    }

    #[test]
    fn only_first_closing_head_is_used() {
        let html = "<html><head></head><body><pre>&lt;/head&gt; </head></pre></body></html>";
        let out = inject_proxy(html);
        assert_eq!(proxy_count(&out), 1);
    }

    #[test]
    fn synthesizes_head_before_body() {
        let html = "<html><body class=\"main\">hi</body></html>";
        let out = inject_proxy(html);
        assert_eq!(proxy_count(&out), 1);
        assert!(out.starts_with("<html><head><script"));
        assert!(out.contains("</script></head><body class=\"main\">hi"));
    }

    #[test]
    fn synthesizes_head_before_uppercase_body() {
        let html = "<HTML><BODY>hi</BODY></HTML>";
        let out = inject_proxy(html);
        assert!(out.contains("</script></head><BODY>hi"));
    }

    #[test]
    fn injection_is_idempotent() {
        let html = "<html><head></head><body></body></html>";
        let once = inject_proxy(html);
        let twice = inject_proxy(&once);
        assert_eq!(once, twice);
        assert_eq!(proxy_count(&twice), 1);
    }

    #[test]
    fn non_html_passes_through() {
        assert_eq!(inject_proxy("plain text"), "plain text");
        assert_eq!(inject_proxy("{\"json\": true}"), "{\"json\": true}");
        // A head tag alone does not make a document HTML-like.
        assert_eq!(inject_proxy("<head></head>"), "<head></head>");
    }

    #[test]
    fn html_without_head_or_body_passes_through() {
        let html = "<html><p>fragment</p></html>";
        assert_eq!(inject_proxy(html), html);
    }

    #[test]
    fn detects_html_documents() {
        assert!(is_html_document("<!DOCTYPE html><html>"));
        assert!(is_html_document("  <HTML lang=\"en\">"));
        assert!(!is_html_document("<div>not a document</div>"));
    }

    #[test]
    fn script_targets_send_endpoint() {
        assert!(PROXY_SCRIPT.contains("fetch('/api/send'"));
        assert!(PROXY_SCRIPT.contains("window.api = new Proxy"));
        assert!(PROXY_SCRIPT.contains("throw new Error(body.error)"));
    }

    #[test]
    fn non_ascii_content_is_preserved() {
        let html = "<html><head><title>欢迎</title></head><body>你好</body></html>";
        let out = inject_proxy(html);
        assert!(out.contains("<title>欢迎</title><script"));
        assert!(out.contains("<body>你好</body>"));
    }
}
