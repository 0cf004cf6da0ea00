use leptos::prelude::*;

use crate::components::status_badge::NodeStatusBadge;
use crate::format::{format_percent, format_time};
use crate::models::Device;
use crate::stats::LoadLevel;

/// Edge node card with load bar, latency, throughput and sync state.
/// Sync and power buttons appear only when their callbacks are given.
#[component]
pub fn DeviceCard(
    device: Device,
    #[prop(optional)] on_sync: Option<Callback<String>>,
    #[prop(optional)] on_power: Option<Callback<String>>,
) -> impl IntoView {
    let level = LoadLevel::from_load(device.load);
    let bar_class = format!("bar-inner {}", level.css_class());
    let bar_width = format!("width: {}%", device.load.clamp(0.0, 100.0));
    let tps = format!("{:.1}", device.transactions_per_sec.unwrap_or(0.0));
    let last_sync = device
        .last_sync
        .as_deref()
        .map(format_time)
        .unwrap_or_else(|| "Never".to_string());
    let online = device.status.is_online();

    let sync_id = device.id.clone();
    let power_id = device.id.clone();

    view! {
        <div class="node-card">
            <div class="node-card-header">
                <div>
                    <h3>{device.name.clone()}</h3>
                    <p>{device.location.clone()}</p>
                </div>
                <NodeStatusBadge status=device.status />
            </div>
            <div class="node-card-body">
                <div class="node-stat-grid">
                    <div class="node-stat node-stat-load">
                        <div class="node-stat-row">
                            <div class="label"><i class="fas fa-microchip"></i>" Load"</div>
                            <div class="value">{format_percent(device.load, 1)}</div>
                        </div>
                        <div class="bar"><div class=bar_class style=bar_width></div></div>
                    </div>
                    <div class="node-stat">
                        <div class="label"><i class="fas fa-network-wired"></i>" Latency"</div>
                        <div class="value">{format!("{:.0}ms", device.latency)}</div>
                    </div>
                    <div class="node-stat">
                        <div class="label"><i class="fas fa-bolt"></i>" TPS"</div>
                        <div class="value">{tps}</div>
                    </div>
                    <div class="node-stat">
                        <div class="label"><i class="fas fa-sync"></i>" Sync"</div>
                        <div class="value value-small">{device.sync_status.clone()}</div>
                    </div>
                </div>

                <div class="node-meta">{format!("Last Sync: {}", last_sync)}</div>

                {(on_sync.is_some() || on_power.is_some()).then(|| view! {
                    <div class="node-actions">
                        {on_sync.map(|cb| view! {
                            <button class="btn-sync" on:click=move |_| cb.run(sync_id.clone())>
                                <i class="fas fa-sync"></i>" Sync"
                            </button>
                        })}
                        {on_power.map(|cb| view! {
                            <button
                                class=if online { "action-button stop" } else { "action-button start" }
                                on:click=move |_| cb.run(power_id.clone())
                            >
                                {if online { "Stop" } else { "Start" }}
                            </button>
                        })}
                    </div>
                })}
            </div>
        </div>
    }
}
