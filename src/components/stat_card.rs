use leptos::prelude::*;

/// Summary tile: title, a large value, an optional subtitle and an icon.
#[component]
pub fn StatCard(
    #[prop(into)] title: String,
    #[prop(into)] value: Signal<String>,
    /// Font Awesome icon name, e.g. "fa-wallet"
    icon: &'static str,
    /// Icon background: "green", "blue", "red" or "purple"
    #[prop(optional)]
    tone: Option<&'static str>,
    #[prop(optional, into)] subtitle: Option<Signal<String>>,
    #[prop(optional)] positive: bool,
) -> impl IntoView {
    let icon_class = format!("stat-card-icon icon-bg-{}", tone.unwrap_or("blue"));
    let subtitle_class = if positive { "subtitle positive" } else { "subtitle" };

    view! {
        <div class="stat-card">
            <div class="stat-card-info">
                <h3>{title}</h3>
                <p class="value">{move || value.get()}</p>
                {subtitle.map(|s| view! { <p class=subtitle_class>{move || s.get()}</p> })}
            </div>
            <div class=icon_class>
                <i class=format!("fas {}", icon)></i>
            </div>
        </div>
    }
}
