use std::convert::Infallible;
use std::process::ExitCode;

use serde_json::json;

use localflare_app::{LocalFlare, PageRequest, Reply};
use localflare_demo::handlers;
use localflare_demo::pages::{not_found_page, ABOUT_TEMPLATE, ABOUT_TEMPLATE_FILE, DEMO_INDEX};

fn main() -> ExitCode {
    let config = localflare_demo::bootstrap("LocalFlare Demo");

    let mut app = LocalFlare::with_config(config);
    handlers::register(&mut app);

    let templates = app.templates();
    let context = json!({
        "name": app.config().window.title,
        "version": env!("CARGO_PKG_VERSION"),
        "handlers": app.message_types().join(", "),
    });

    app.route("/", |_req: &PageRequest| Ok::<_, Infallible>(DEMO_INDEX.to_string()))
        .route("/about", move |_req: &PageRequest| {
            let name = match templates.folder() {
                Some(_) => ABOUT_TEMPLATE_FILE,
                None => ABOUT_TEMPLATE,
            };
            templates.render(name, &context)
        })
        .error_handler(404, |ctx| Reply::html(404, not_found_page(&ctx.request.path)));

    match app.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("localflare-demo failed: {e}");
            ExitCode::FAILURE
        }
    }
}
