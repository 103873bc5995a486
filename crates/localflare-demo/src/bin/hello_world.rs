use std::convert::Infallible;
use std::process::ExitCode;

use localflare_app::{LocalFlare, PageRequest};
use localflare_demo::pages::HELLO_INDEX;

fn main() -> ExitCode {
    let config = localflare_demo::bootstrap("Hello LocalFlare");

    let mut app = LocalFlare::with_config(config);
    app.route("/", |_req: &PageRequest| Ok::<_, Infallible>(HELLO_INDEX.to_string()));

    match app.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("hello-world failed: {e}");
            ExitCode::FAILURE
        }
    }
}
