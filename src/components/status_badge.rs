use leptos::prelude::*;

use crate::models::{Decision, DeviceStatus, StripeStatus};

/// Payment status pill, e.g. "Succeeded" in green.
#[component]
pub fn StatusBadge(status: StripeStatus) -> impl IntoView {
    let class = format!("status-badge {}", status.css_class());
    view! { <span class=class>{status.label()}</span> }
}

/// Edge / cloud / flagged routing decision.
#[component]
pub fn DecisionBadge(
    /// `None` when the server has not decided yet
    decision: Option<Decision>,
) -> impl IntoView {
    let decision = decision.unwrap_or(Decision::Unknown);
    view! { <span class=decision.badge_class()>{decision.as_str()}</span> }
}

#[component]
pub fn NodeStatusBadge(status: DeviceStatus) -> impl IntoView {
    let class = if status.is_online() {
        "node-status-badge"
    } else {
        "node-status-badge offline"
    };
    view! { <span class=class>{status.label()}</span> }
}
