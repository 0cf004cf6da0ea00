//! Fixed-interval refresh for page controllers.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// A tick only runs while the browser is still on the page that started it.
pub fn route_matches(route: &str, pathname: &str) -> bool {
    let trim = |p: &str| {
        let t = p.trim_end_matches('/');
        if t.is_empty() {
            "/".to_string()
        } else {
            t.to_string()
        }
    };
    trim(route) == trim(pathname)
}

fn current_pathname() -> Option<String> {
    web_sys::window()?.location().pathname().ok()
}

/// Run `tick` now and then every `period_ms` while the current route is
/// `route`. The interval is cleared when the owning component unmounts.
pub fn use_poller<F>(route: &'static str, period_ms: i32, tick: F)
where
    F: Fn() + 'static,
{
    tick();

    let callback = Closure::wrap(Box::new(move || {
        match current_pathname() {
            Some(path) if route_matches(route, &path) => {
                log::debug!("Poll tick for {}", route);
                tick();
            }
            _ => log::debug!("Skipping poll tick for {}, route changed", route),
        }
    }) as Box<dyn Fn()>);

    let Some(window) = web_sys::window() else {
        return;
    };
    let interval_id = match window.set_interval_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        period_ms,
    ) {
        Ok(id) => id,
        Err(e) => {
            log::error!("Failed to start poller for {}: {:?}", route, e);
            return;
        }
    };
    callback.forget();

    on_cleanup(move || {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(interval_id);
        }
    });
}
