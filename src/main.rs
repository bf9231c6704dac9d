use std::rc::Rc;

mod components;
mod config;
mod error;
mod logging;
mod model;
mod services;
mod state;
mod util;

use components::app::{App, AppProps};

fn main() {
    let config = config::AppConfig::load();
    logging::init(&config.log_level);
    tracing::info!(api = %config.api_url, "starting client");
    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
