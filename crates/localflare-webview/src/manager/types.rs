/// Configuration for the window's WebView.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// URL to load, normally the local server root.
    pub url: String,
    /// Origins navigation may go to. `about:blank` is always allowed.
    pub allowed_origins: Vec<String>,
    /// Whether to enable dev tools (always on in debug builds).
    pub devtools: bool,
    /// Whether the user may select page text.
    pub text_select: bool,
    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl WebViewConfig {
    /// Load `url` and allow navigation within its origin only.
    pub fn for_local_server(url: impl Into<String>) -> Self {
        let url = url.into();
        let origin = url.trim_end_matches('/').to_string();
        Self {
            url,
            allowed_origins: vec![origin],
            devtools: cfg!(debug_assertions),
            text_select: true,
            user_agent: Some(format!("LocalFlare/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_server_config_allows_its_origin() {
        let config = WebViewConfig::for_local_server("http://127.0.0.1:9517/");
        assert_eq!(config.url, "http://127.0.0.1:9517/");
        assert_eq!(config.allowed_origins, vec!["http://127.0.0.1:9517"]);
        assert!(config.text_select);
        assert!(config.user_agent.unwrap().starts_with("LocalFlare/"));
    }
}
