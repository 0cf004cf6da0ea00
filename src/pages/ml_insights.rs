use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{live_client, use_api};
use crate::charts::{specs, use_charts};
use crate::components::chart_canvas::ChartCanvas;
use crate::components::page_header::PageHeader;
use crate::components::shell::use_session;
use crate::components::stat_card::StatCard;
use crate::config::use_config;
use crate::format::{format_ratio, format_rm, format_time, format_timestamp};
use crate::models::{Decision, DecisionLog, LiveVerification, MlData, Transaction};
use crate::pages::{poll_result, Heading};
use crate::poller::use_poller;
use crate::stats::{latest_metric, prediction_breakdown, PredictionBreakdown};

const ROUTE: &str = "/ml-insights";
const PREDICTION_CANVAS: &str = "mlPredictionChart";
const RECENT_PREDICTIONS: usize = 10;

fn decision_of(d: Option<Decision>) -> Decision {
    d.unwrap_or(Decision::Unknown)
}

#[component]
pub fn MlInsightsPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let config = use_config();
    let charts = use_charts();
    let heading = Heading::for_session(
        use_session().as_ref(),
        ("Global ML Insights", "Aggregated AI performance metrics across all edge nodes"),
        |loc| {
            (
                format!("ML Insights - {}", loc),
                format!("AI performance metrics for {} edge node", loc),
            )
        },
    );

    let (data, set_data) = signal(MlData::default());
    let (error, set_error) = signal::<Option<String>>(None);

    let fetch = move || {
        let Some(client) = live_client(api) else {
            return;
        };
        spawn_local(async move {
            if let Some(value) = poll_result("ML data", client.ml_data().await, set_error) {
                set_data.set(value);
            }
        });
    };
    use_poller(ROUTE, config.polling.ml_ms, fetch);

    let breakdown = Memo::new(move |_| data.with(|d| prediction_breakdown(&d.transactions)));
    let latest = Memo::new(move |_| data.with(|d| latest_metric(&d.metrics)));

    Effect::new(move |_| {
        let b = breakdown.get();
        charts.with_value(|registry| {
            registry.render_or_log(PREDICTION_CANVAS, &specs::prediction_chart(&b));
        });
    });

    view! {
        <div class="page ml-insights-page">
            <PageHeader
                title=heading.title
                subtitle=heading.subtitle
                on_refresh=Callback::new(move |_| fetch())
            />

            {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}

            {move || data.with(|d| d.latest_verification.clone()).map(|v| view! {
                <LiveVerificationCard verification=v />
            })}

            <div class="stat-card-grid">
                <StatCard
                    title="Model Accuracy"
                    value=Signal::derive(move || format_ratio(latest.get().accuracy, 1))
                    icon="fa-bullseye"
                    tone="blue"
                />
                <StatCard
                    title="Fraud Detected"
                    value=Signal::derive(move || latest.get().fraud_detected.to_string())
                    icon="fa-shield-alt"
                    tone="red"
                />
                <StatCard
                    title="Avg Confidence"
                    value=Signal::derive(move || format_ratio(latest.get().avg_confidence, 1))
                    icon="fa-check-double"
                    tone="green"
                    subtitle=Signal::derive(|| "Across all predictions".to_string())
                />
                <StatCard
                    title="Processing Time"
                    value=Signal::derive(move || format!("{}ms", latest.get().processing_time))
                    icon="fa-stopwatch"
                    tone="purple"
                />
            </div>

            <div class="chart-grid">
                <div class="card">
                    <h3>"Prediction Distribution"</h3>
                    <ChartCanvas id=PREDICTION_CANVAS />
                    <PredictionSummary breakdown=breakdown />
                </div>
                <div class="card">
                    <h3>"Recent Predictions"</h3>
                    <div class="prediction-list">
                        {move || data.with(|d| {
                            d.transactions
                                .iter()
                                .take(RECENT_PREDICTIONS)
                                .map(prediction_item)
                                .collect_view()
                        })}
                    </div>
                </div>
            </div>

            <div class="card">
                <div class="card-header-row">
                    <h3>"Processing Decisions"</h3>
                    <div class="decision-counts">
                        <span class="badge edge">
                            {move || data.with(|d| count_logs(&d.decisions, Decision::Edge).to_string())}" edge"
                        </span>
                        <span class="badge cloud">
                            {move || data.with(|d| count_logs(&d.decisions, Decision::Cloud).to_string())}" cloud"
                        </span>
                    </div>
                </div>
                <div class="decision-list">
                    {move || data.with(|d| d.decisions.iter().map(decision_item).collect_view())}
                </div>
            </div>
        </div>
    }
}

fn count_logs(logs: &[DecisionLog], decision: Decision) -> usize {
    logs.iter().filter(|l| l.decision == Some(decision)).count()
}

#[component]
fn PredictionSummary(breakdown: Memo<PredictionBreakdown>) -> impl IntoView {
    let slots = [
        (Decision::Edge, "Edge", "value-green"),
        (Decision::Cloud, "Cloud", "value-blue"),
        (Decision::Flagged, "Flagged", "value-red"),
    ];

    view! {
        <div class="prediction-summary">
            {slots
                .into_iter()
                .enumerate()
                .map(|(i, (decision, label, class))| view! {
                    <div class="prediction-stat">
                        <span class=class style=format!("color: {}", decision.color())>
                            {move || breakdown.get().counts()[i].to_string()}
                        </span>
                        <span class="label">{label}</span>
                        <span class="pct">
                            {move || {
                                let b = breakdown.get();
                                format!("{}%", b.percent(b.counts()[i]))
                            }}
                        </span>
                    </div>
                })
                .collect_view()}
        </div>
    }
}

fn prediction_item(t: &Transaction) -> impl IntoView {
    let decision = t.decision();
    let kind = t.kind.clone().unwrap_or_else(|| "payment".to_string());
    let confidence = format_ratio(t.confidence.unwrap_or(0.0), 1);

    view! {
        <div class="prediction-item">
            <div class="prediction-info">
                <div class=format!("prediction-icon {}", decision.as_str())>
                    <i class=format!("fas {}", decision.icon())></i>
                </div>
                <div class="details">{format_rm(t.amount)}" "<span>{format!("- {}", kind)}</span></div>
            </div>
            <div class="prediction-status">
                <div class=decision.badge_class()>{decision.as_str()}</div>
                <div class="confidence">{format!("{} confidence", confidence)}</div>
            </div>
        </div>
    }
}

fn decision_item(d: &DecisionLog) -> impl IntoView {
    let decision = decision_of(d.decision);
    let time = d.timestamp.as_deref().map(format_time).unwrap_or_default();

    view! {
        <div class="decision-item">
            <div class="decision-item-header">
                <div class="decision-info">
                    <div class=format!("decision-icon {}", decision.as_str())>
                        <i class=format!("fas {}", decision.icon())></i>
                    </div>
                    <div class="decision-details">
                        <h4>{d.data_type.clone()}</h4>
                        <p>{d.reason.clone()}</p>
                    </div>
                </div>
                <div class="decision-meta">
                    <div class=decision.badge_class()>{decision.as_str()}</div>
                    <div class="size">{format!("{} KB", d.size)}</div>
                </div>
            </div>
            <div class="decision-footer">
                <div>
                    "Priority: "
                    <span class=format!("priority-badge {}", d.priority)>{d.priority.clone()}</span>
                </div>
                <div>{time}</div>
            </div>
        </div>
    }
}

#[component]
fn LiveVerificationCard(verification: LiveVerification) -> impl IntoView {
    let decision = decision_of(verification.decision);

    view! {
        <div class="card live-verification-card">
            <div class="card-header-row">
                <h3><i class="fas fa-check-circle value-green"></i>" Live Model Verification"</h3>
                <span class="mono">{format!("ID: {}", verification.id)}</span>
            </div>
            <div class="verification-grid">
                <div class="verification-cell">
                    <small>"Input Features"</small>
                    <div>
                        {format!(
                            "Amount: {} \u{2022} Latency: {:.1} ms",
                            format_rm(verification.amount),
                            verification.latency
                        )}
                    </div>
                </div>
                <div class="verification-cell">
                    <small>"Model Decision"</small>
                    <div class="verification-decision" style=format!("color: {}", decision.color())>
                        <i class=format!("fas {}", decision.icon())></i>
                        " "{decision.as_str().to_uppercase()}
                    </div>
                </div>
                <div class="verification-cell">
                    <small>"Confidence Score"</small>
                    <div>{format_ratio(verification.confidence, 1)}</div>
                </div>
            </div>
            <div class="verification-footer">
                {format!("Verified at {}", format_timestamp(verification.timestamp.as_deref()))}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(decision: Option<Decision>) -> DecisionLog {
        DecisionLog {
            decision,
            data_type: "Transaction".to_string(),
            reason: "Low latency path".to_string(),
            size: 2.5,
            priority: "high".to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn test_decision_log_counts() {
        let logs = vec![
            log(Some(Decision::Edge)),
            log(Some(Decision::Edge)),
            log(Some(Decision::Cloud)),
            log(None),
        ];
        assert_eq!(count_logs(&logs, Decision::Edge), 2);
        assert_eq!(count_logs(&logs, Decision::Cloud), 1);
        assert_eq!(count_logs(&logs, Decision::Flagged), 0);
    }

    #[test]
    fn test_missing_decision_is_unknown() {
        assert_eq!(decision_of(None), Decision::Unknown);
        assert_eq!(decision_of(Some(Decision::Flagged)), Decision::Flagged);
    }
}
