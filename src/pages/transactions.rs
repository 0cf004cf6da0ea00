use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{live_client, use_api, ApiError};
use crate::charts::{specs, use_charts};
use crate::components::banner::{Banner, BannerMessage};
use crate::components::chart_canvas::ChartCanvas;
use crate::components::modal::Modal;
use crate::components::page_header::PageHeader;
use crate::components::payment_panel::PaymentPanel;
use crate::components::shell::use_session;
use crate::components::stat_card::StatCard;
use crate::components::status_badge::{DecisionBadge, StatusBadge};
use crate::config::use_config;
use crate::format::{format_percent, format_rm, format_rm_thousands, format_timestamp, or_dash, short_id};
use crate::models::{DashboardData, Decision, StripeStatus, Transaction, TransactionPage};
use crate::pages::{fetch_error, poll_result, Heading};
use crate::payment::{self, RedirectReturn};
use crate::poller::use_poller;
use crate::stats::{
    average_latency, count_decision, count_status, edge_rate, latency_split, pipeline, success_rate,
    total_volume,
};

const ROUTE: &str = "/transactions";
const LOCATION_CANVAS: &str = "txnLocationChart";
const STATUS_CANVAS: &str = "txnStatusChart";

/// Position in the paginated transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub pages: u32,
}

impl Pager {
    pub fn from_page(page: &TransactionPage) -> Self {
        let current = page.current_page.max(1);
        Self {
            page: current,
            pages: page.pages.max(1),
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.pages)
    }
}

/// Balance for the header, or the text shown beside "RM --" when the
/// dashboard call failed.
fn balance_outcome(result: Result<DashboardData, ApiError>) -> Result<Option<f64>, Option<String>> {
    match result {
        Ok(d) => Ok(d.user_balance),
        Err(e) => Err(fetch_error("balance", e)),
    }
}

fn redirect_banner(redirect: &RedirectReturn) -> BannerMessage {
    if redirect.succeeded() {
        BannerMessage::success(redirect.banner())
    } else {
        BannerMessage::error(redirect.banner())
    }
}

#[component]
pub fn TransactionsPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let config = use_config();
    let per_page = config.page_size;
    let charts = use_charts();
    let heading = Heading::for_session(
        use_session().as_ref(),
        ("Transaction Processing", "Stripe payment integration with edge/cloud processing"),
        |loc| {
            (
                format!("Transaction Processing - {}", loc),
                format!("Payment processing with Stripe integration for {} edge node", loc),
            )
        },
    );

    let (list, set_list) = signal(TransactionPage::default());
    let (requested, set_requested) = signal(1u32);
    let (balance, set_balance) = signal::<Option<f64>>(None);
    let (balance_error, set_balance_error) = signal::<Option<String>>(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (banner, set_banner) = signal::<Option<BannerMessage>>(None);
    let (selected, set_selected) = signal::<Option<Transaction>>(None);

    let load = move |number: u32| {
        set_requested.set(number);
        let Some(client) = live_client(api) else {
            return;
        };
        spawn_local(async move {
            if let Some(page) = poll_result("transactions", client.transactions(number, per_page).await, set_error) {
                set_list.set(page);
            }
        });
    };

    let load_balance = move || {
        let Some(client) = live_client(api) else {
            return;
        };
        spawn_local(async move {
            match balance_outcome(client.dashboard_data().await) {
                Ok(amount) => {
                    set_balance_error.set(None);
                    set_balance.set(amount);
                }
                Err(message) => {
                    set_balance.set(None);
                    set_balance_error.set(message);
                }
            }
        });
    };

    let refresh = move || {
        let Some(page) = requested.try_get_untracked() else {
            return;
        };
        load(page);
        load_balance();
    };

    if let Some(redirect) = payment::take_redirect_return() {
        let client = api.get_value();
        spawn_local(async move {
            if let Err(e) = payment::record_redirect(&client, &redirect).await {
                log::error!("Recording redirected payment failed: {}", e);
            }
            set_banner.set(Some(redirect_banner(&redirect)));
            refresh();
        });
    }
    use_poller(ROUTE, config.polling.transactions_ms, refresh);

    Effect::new(move |_| {
        list.with(|p| {
            charts.with_value(|registry| {
                registry.render_or_log(LOCATION_CANVAS, &specs::location_chart(&latency_split(&p.transactions)));
                registry.render_or_log(STATUS_CANVAS, &specs::status_chart(&p.transactions));
            });
        });
    });

    let pager = Memo::new(move |_| list.with(Pager::from_page));
    let split = Memo::new(move |_| list.with(|p| latency_split(&p.transactions)));
    let stages = Memo::new(move |_| list.with(|p| pipeline(&p.transactions)));

    let txns = move |f: fn(&[Transaction]) -> String| from_rows(list, f);

    view! {
        <div class="page transactions-page">
            <PageHeader
                title=heading.title
                subtitle=heading.subtitle
                on_refresh=Callback::new(move |_| refresh())
            >
                <div class="balance-display">
                    <span class="label">"Balance"</span>
                    <span id="user-balance-display" class="value">
                        {move || balance.get().map(format_rm).unwrap_or_else(|| "RM --".to_string())}
                    </span>
                    {move || balance_error.get().map(|e| view! { <span class="balance-error">{e}</span> })}
                </div>
            </PageHeader>

            <Banner message=banner on_dismiss=Callback::new(move |_| set_banner.set(None)) />
            {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}

            <div class="stat-card-grid">
                <StatCard
                    title="Total Volume"
                    value=txns(|t| format_rm_thousands(total_volume(t)))
                    icon="fa-dollar-sign"
                    tone="blue"
                />
                <StatCard
                    title="Successful"
                    value=txns(|t| count_status(t, StripeStatus::Succeeded).to_string())
                    icon="fa-check-circle"
                    tone="green"
                    subtitle=txns(|t| format!("{} success rate", format_percent(success_rate(t), 1)))
                />
                <StatCard
                    title="Edge Processed"
                    value=txns(|t| count_decision(t, Decision::Edge).to_string())
                    icon="fa-arrow-right"
                    tone="green"
                    subtitle=txns(|t| format!("{} at edge", format_percent(edge_rate(t), 0)))
                    positive=true
                />
                <StatCard
                    title="Avg Latency"
                    value=txns(|t| format!("{:.0}ms", average_latency(t)))
                    icon="fa-clock"
                    tone="purple"
                    subtitle=Signal::derive(|| "Edge + Cloud".to_string())
                />
            </div>

            <div class="chart-grid">
                <div class="card">
                    <h3>"Processing Location"</h3>
                    <ChartCanvas id=LOCATION_CANVAS />
                    <div class="split-summary">
                        <div>
                            <span class="value-green">{move || split.get().edge_count.to_string()}</span>
                            <span class="label">"Edge"</span>
                            <span class="pct">{move || format!("Avg {:.0} ms", split.get().edge_avg)}</span>
                        </div>
                        <div>
                            <span class="value-blue">{move || split.get().cloud_count.to_string()}</span>
                            <span class="label">"Cloud"</span>
                            <span class="pct">{move || format!("Avg {:.0} ms", split.get().cloud_avg)}</span>
                        </div>
                    </div>
                </div>
                <div class="card">
                    <h3>"Payment Status"</h3>
                    <ChartCanvas id=STATUS_CANVAS />
                </div>
            </div>

            <div class="transactions-layout">
                <div class="card">
                    <h3>"Transaction History"</h3>
                    <div class="table-scroll">
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th>"ID"</th>
                                    <th>"Amount"</th>
                                    <th>"Status"</th>
                                    <th>"Decision"</th>
                                    <th>"Time"</th>
                                    <th>"Recipient"</th>
                                    <th>"Reference"</th>
                                    <th>"Merchant"</th>
                                    <th>"Device"</th>
                                    <th>"Customer"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {move || list.with(|p| {
                                    p.transactions
                                        .iter()
                                        .map(|t| {
                                            let row = t.clone();
                                            view! {
                                                <tr class="clickable" on:click=move |_| set_selected.set(Some(row.clone()))>
                                                    <td class="mono">{short_id(&t.id, 14)}</td>
                                                    <td>{format_rm(t.amount)}</td>
                                                    <td><StatusBadge status=t.stripe_status /></td>
                                                    <td><DecisionBadge decision=t.processing_decision /></td>
                                                    <td>{format_timestamp(t.timestamp.as_deref())}</td>
                                                    <td>{or_dash(t.recipient.as_deref())}</td>
                                                    <td>{or_dash(t.reference.as_deref())}</td>
                                                    <td>{t.merchant.clone().unwrap_or_else(|| "Unknown".to_string())}</td>
                                                    <td>{or_dash(t.device_id.as_deref())}</td>
                                                    <td>{or_dash(t.customer_id.as_deref())}</td>
                                                </tr>
                                            }
                                        })
                                        .collect_view()
                                })}
                            </tbody>
                        </table>
                    </div>
                    <div class="pagination">
                        <button
                            class="btn btn-secondary"
                            disabled=move || !pager.get().has_prev()
                            on:click=move |_| load(pager.get_untracked().page.saturating_sub(1).max(1))
                        >
                            "Previous"
                        </button>
                        <span class="page-info">{move || pager.get().label()}</span>
                        <button
                            class="btn btn-secondary"
                            disabled=move || !pager.get().has_next()
                            on:click=move |_| load(pager.get_untracked().page + 1)
                        >
                            "Next"
                        </button>
                    </div>
                </div>

                <PaymentPanel on_paid=Callback::new(move |_| refresh()) />
            </div>

            <div class="card">
                <h3>"Transaction Pipeline"</h3>
                <div class="pipeline-grid">
                    <PipelineStep count=Signal::derive(move || stages.get().initiated) label="Initiated" />
                    <div class="pipeline-arrow"><i class="fas fa-arrow-right"></i></div>
                    <PipelineStep count=Signal::derive(move || stages.get().validated) label="ML Validated" />
                    <div class="pipeline-arrow"><i class="fas fa-arrow-right"></i></div>
                    <PipelineStep count=Signal::derive(move || stages.get().processed) label="Processed" />
                    <div class="pipeline-arrow"><i class="fas fa-arrow-right"></i></div>
                    <PipelineStep count=Signal::derive(move || stages.get().successful) label="Successful" />
                </div>
            </div>

            {move || selected.get().map(|t| view! {
                <Modal title="Transaction Details" on_close=Callback::new(move |_| set_selected.set(None))>
                    <TransactionDetails transaction=t />
                </Modal>
            })}
        </div>
    }
}

/// Stat derived from the rows currently on screen.
fn from_rows(list: ReadSignal<TransactionPage>, f: fn(&[Transaction]) -> String) -> Signal<String> {
    Signal::derive(move || list.with(|p| f(&p.transactions)))
}

#[component]
fn PipelineStep(count: Signal<usize>, label: &'static str) -> impl IntoView {
    view! {
        <div class="pipeline-step">
            <h4>{move || count.get().to_string()}</h4>
            <p>{label}</p>
        </div>
    }
}

#[component]
fn TransactionDetails(transaction: Transaction) -> impl IntoView {
    let t = transaction;
    let row = |label: &'static str, value: String| {
        view! {
            <div class="detail-row">
                <span class="detail-label">{label}</span>
                <span class="detail-value">{value}</span>
            </div>
        }
    };

    view! {
        <div class="transaction-details">
            {row("Transaction ID", t.id.clone())}
            {row("Amount", format_rm(t.amount))}
            <div class="detail-row">
                <span class="detail-label">"Status"</span>
                <span class="detail-value"><StatusBadge status=t.stripe_status /></span>
            </div>
            {row("Date & Time", format_timestamp(t.timestamp.as_deref()))}
            <hr class="detail-divider" />
            <div class="detail-row">
                <span class="detail-label">"Processing Decision"</span>
                <span class="detail-value"><DecisionBadge decision=t.processing_decision /></span>
            </div>
            {row("Recipient", or_dash(t.recipient.as_deref()))}
            {row("Reference", or_dash(t.reference.as_deref()))}
            {row("Merchant", t.merchant.clone().unwrap_or_else(|| "Unknown".to_string()))}
            {row("Device ID", or_dash(t.device_id.as_deref()))}
            {row("Customer ID", or_dash(t.customer_id.as_deref()))}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(current_page: u32, pages: u32) -> TransactionPage {
        TransactionPage {
            current_page,
            pages,
            ..Default::default()
        }
    }

    #[test]
    fn test_balance_failure_keeps_message() {
        let ok = DashboardData {
            user_balance: Some(1250.0),
            ..Default::default()
        };
        assert_eq!(balance_outcome(Ok(ok)), Ok(Some(1250.0)));
        assert_eq!(
            balance_outcome(Err(ApiError::Network("offline".to_string()))),
            Err(Some("Network error: offline".to_string()))
        );
        assert_eq!(balance_outcome(Err(ApiError::Unauthorized)), Err(None));
    }

    #[test]
    fn test_first_page_disables_previous() {
        let pager = Pager::from_page(&page(1, 3));
        assert!(!pager.has_prev());
        assert!(pager.has_next());
        assert_eq!(pager.label(), "Page 1 of 3");
    }

    #[test]
    fn test_last_page_disables_next() {
        let pager = Pager::from_page(&page(3, 3));
        assert!(pager.has_prev());
        assert!(!pager.has_next());
    }

    #[test]
    fn test_empty_list_is_single_page() {
        let pager = Pager::from_page(&page(1, 0));
        assert_eq!(pager, Pager { page: 1, pages: 1 });
        assert!(!pager.has_prev());
        assert!(!pager.has_next());
    }

    #[test]
    fn test_redirect_banner_kind() {
        let ok = RedirectReturn {
            payment_intent: "pi_1".to_string(),
            redirect_status: "succeeded".to_string(),
        };
        let failed = RedirectReturn {
            redirect_status: "failed".to_string(),
            ..ok.clone()
        };
        assert_eq!(redirect_banner(&ok), BannerMessage::success("Payment Successful!"));
        assert_eq!(redirect_banner(&failed), BannerMessage::error("Payment Failed or Canceled."));
    }
}
