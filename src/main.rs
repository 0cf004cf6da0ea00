mod api;
mod app;
mod charts;
mod components;
mod config;
mod format;
mod models;
mod pages;
mod payment;
mod poller;
mod session;
mod stats;
mod theme;
mod validation;

use leptos::prelude::*;

use app::App;
use config::AppConfig;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_document();
    let _ = console_log::init_with_level(config.log_level);
    log::info!("BankEdge console starting, api base {:?}", config.api_base);

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
