use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{live_client, use_api, ApiError};
use crate::components::device_card::DeviceCard;
use crate::components::page_header::PageHeader;
use crate::components::stat_card::StatCard;
use crate::config::use_config;
use crate::format::format_percent;
use crate::models::{Device, DeviceActionResult};
use crate::pages::{fetch_error, poll_result};
use crate::poller::use_poller;
use crate::stats::device_summary;

const ROUTE: &str = "/edge-devices";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceAction {
    Sync,
    Power,
}

/// An action reply carrying `error` is shown to the user; anything else
/// means the list should be fetched again.
fn action_outcome(result: Result<DeviceActionResult, ApiError>) -> Result<(), Option<String>> {
    match result {
        Ok(DeviceActionResult { error: Some(e), .. }) => Err(Some(e)),
        Ok(_) => Ok(()),
        Err(e) => Err(fetch_error("device action", e)),
    }
}

#[component]
pub fn EdgeDevicesPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let config = use_config();

    let (devices, set_devices) = signal(Vec::<Device>::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let fetch = move || {
        let Some(client) = live_client(api) else {
            return;
        };
        spawn_local(async move {
            if let Some(value) = poll_result("devices", client.devices().await, set_error) {
                set_devices.set(value);
            }
        });
    };
    use_poller(ROUTE, config.polling.devices_ms, fetch);

    let run_action = move |action: DeviceAction, device_id: String| {
        set_error.set(None);
        let Some(client) = live_client(api) else {
            return;
        };
        spawn_local(async move {
            let result = match action {
                DeviceAction::Sync => client.sync_device(&device_id).await,
                DeviceAction::Power => client.toggle_device_power(&device_id).await,
            };
            match action_outcome(result) {
                Ok(()) => {
                    log::info!("{:?} applied to {}", action, device_id);
                    fetch();
                }
                Err(message) => set_error.set(message),
            }
        });
    };
    let on_sync = Callback::new(move |id: String| run_action(DeviceAction::Sync, id));
    let on_power = Callback::new(move |id: String| run_action(DeviceAction::Power, id));

    let summary = Memo::new(move |_| devices.with(|d| device_summary(d)));

    view! {
        <div class="page edge-devices-page">
            <PageHeader
                title="Edge Devices"
                subtitle="Monitor and control edge processing nodes"
                on_refresh=Callback::new(move |_| fetch())
            />

            {move || error.get().map(|e| view! {
                <div class="error-message">
                    <span>{e}</span>
                    <button class="alert-close" on:click=move |_| set_error.set(None)>"\u{00d7}"</button>
                </div>
            })}

            <div class="stat-card-grid">
                <StatCard
                    title="Total Nodes"
                    value=Signal::derive(move || summary.get().total.to_string())
                    icon="fa-server"
                    tone="blue"
                />
                <StatCard
                    title="Online"
                    value=Signal::derive(move || summary.get().online.to_string())
                    icon="fa-check-circle"
                    tone="green"
                />
                <StatCard
                    title="Offline"
                    value=Signal::derive(move || summary.get().offline.to_string())
                    icon="fa-times-circle"
                    tone="red"
                />
                <StatCard
                    title="Avg Load"
                    value=Signal::derive(move || format_percent(summary.get().avg_load, 1))
                    icon="fa-microchip"
                    tone="purple"
                />
            </div>

            <div class="node-grid">
                {move || devices.with(|list| {
                    list.iter()
                        .map(|device| view! {
                            <DeviceCard device=device.clone() on_sync=on_sync on_power=on_power />
                        })
                        .collect_view()
                })}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_with_error_is_shown() {
        let reply = DeviceActionResult {
            error: Some("Device is offline".to_string()),
            ..Default::default()
        };
        assert_eq!(action_outcome(Ok(reply)), Err(Some("Device is offline".to_string())));
    }

    #[test]
    fn test_success_reply_refreshes() {
        let reply = DeviceActionResult {
            message: Some("Sync complete".to_string()),
            ..Default::default()
        };
        assert_eq!(action_outcome(Ok(reply)), Ok(()));
    }

    #[test]
    fn test_expired_session_shows_nothing() {
        assert_eq!(action_outcome(Err(ApiError::Unauthorized)), Err(None));
    }
}
