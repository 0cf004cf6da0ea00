use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{live_client, use_api};
use crate::charts::{specs, use_charts};
use crate::components::chart_canvas::ChartCanvas;
use crate::components::device_card::DeviceCard;
use crate::components::page_header::PageHeader;
use crate::components::shell::use_session;
use crate::components::stat_card::StatCard;
use crate::components::status_badge::{DecisionBadge, StatusBadge};
use crate::config::use_config;
use crate::format::{format_confidence, format_rm, format_timestamp, or_dash};
use crate::models::{DashboardData, Transaction};
use crate::pages::poll_result;
use crate::poller::use_poller;
use crate::stats::load_chart_height;

const ROUTE: &str = "/dashboard";
const LATENCY_CANVAS: &str = "latencyChart";
const LOAD_CANVAS: &str = "loadChart";

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let config = use_config();
    let show_edge_node = use_session().is_some_and(|s| s.is_superadmin());
    let charts = use_charts();

    let (data, set_data) = signal(DashboardData::default());
    let (error, set_error) = signal::<Option<String>>(None);

    let fetch = move || {
        let Some(client) = live_client(api) else {
            return;
        };
        spawn_local(async move {
            if let Some(value) = poll_result("dashboard data", client.dashboard_data().await, set_error) {
                set_data.set(value);
            }
        });
    };
    use_poller(ROUTE, config.polling.dashboard_ms, fetch);

    Effect::new(move |_| {
        data.with(|d| {
            charts.with_value(|registry| {
                registry.render_or_log(LATENCY_CANVAS, &specs::latency_chart(&d.latency));
                if !d.devices.is_empty() {
                    registry.render_or_log(LOAD_CANVAS, &specs::load_chart(&d.devices));
                }
            });
        });
    });

    let balance = Signal::derive(move || data.with(|d| format_rm(d.user_balance.unwrap_or(0.0))));
    let activity = Signal::derive(move || data.with(|d| d.transactions.len().to_string()));
    let load_height = Signal::derive(move || data.with(|d| load_chart_height(d.devices.len())));

    view! {
        <div class="page dashboard-page">
            <PageHeader
                title="Dashboard"
                subtitle="Real-time edge/cloud transaction overview"
                on_refresh=Callback::new(move |_| fetch())
            >
                {move || data.with(|d| d.device_box.clone()).map(|b| view! {
                    <div class="device-info-box">
                        <span><strong>"Device: "</strong>{b.id}</span>
                        <span><strong>"Location: "</strong>{b.location}</span>
                        <span><strong>"Status: "</strong>{b.status.to_uppercase()}</span>
                        <span><strong>"Sync: "</strong>{b.sync_status}</span>
                    </div>
                })}
            </PageHeader>

            {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}

            <div class="stat-card-grid">
                <StatCard
                    title="Current Balance"
                    value=balance
                    icon="fa-wallet"
                    tone="green"
                    subtitle=Signal::derive(|| "Available Funds".to_string())
                    positive=true
                />
                <StatCard
                    title="Recent Activity"
                    value=activity
                    icon="fa-list"
                    tone="blue"
                    subtitle=Signal::derive(|| "Transactions".to_string())
                />
            </div>

            <div class="chart-grid">
                <div class="card">
                    <h3>"Processing Latency (ms)"</h3>
                    <ChartCanvas id=LATENCY_CANVAS />
                </div>
                <div class="card">
                    <h3>"Edge Node Load"</h3>
                    <ChartCanvas id=LOAD_CANVAS height=load_height />
                </div>
            </div>

            <div class="card">
                <h3>"Recent Transactions"</h3>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            {show_edge_node.then(|| view! { <th>"Edge Node"</th> })}
                            <th>"Amount"</th>
                            <th>"Status"</th>
                            <th>"Decision"</th>
                            <th>"Confidence"</th>
                            <th>"Time"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || data.with(|d| {
                            d.transactions
                                .iter()
                                .map(|t| transaction_row(t, show_edge_node))
                                .collect_view()
                        })}
                    </tbody>
                </table>
            </div>

            <div class="card">
                <h3>"Edge Nodes"</h3>
                <div class="node-grid">
                    {move || data.with(|d| {
                        d.devices
                            .iter()
                            .map(|device| view! { <DeviceCard device=device.clone() /> })
                            .collect_view()
                    })}
                </div>
            </div>
        </div>
    }
}

fn transaction_row(t: &Transaction, show_edge_node: bool) -> impl IntoView {
    let edge_node = or_dash(t.device_name.as_deref());
    view! {
        <tr>
            <td>{t.id.clone()}</td>
            {show_edge_node.then(|| view! { <td>{edge_node}</td> })}
            <td>{format_rm(t.amount)}</td>
            <td><StatusBadge status=t.stripe_status /></td>
            <td><DecisionBadge decision=t.processing_decision /></td>
            <td>{format_confidence(t.confidence)}</td>
            <td>{format_timestamp(t.timestamp.as_deref())}</td>
        </tr>
    }
}
