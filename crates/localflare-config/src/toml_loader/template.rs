//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# LocalFlare Configuration
# Only override what you want to change -- missing fields use defaults.

# debug = false
# template_folder = "templates"

[server]
# host = "127.0.0.1"
# port = 9517             # 0 = pick a free port
# max_body_bytes = 10485760   # unset = no limit on /api/send bodies

[window]
# title = "LocalFlare App"
# width = 800
# height = 600
# resizable = true
# text_select = true
# confirm_close = true

[startup]
# timeout_ms = 10000
# poll_interval_ms = 100

[logging]
# level = "localflare=info"
"##
    .to_string()
}
