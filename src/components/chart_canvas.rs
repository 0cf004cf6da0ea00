use leptos::prelude::*;

/// Canvas target for a chart. The canvas stays mounted for the life of the
/// page so the registry's instance keeps drawing into the same element.
#[component]
pub fn ChartCanvas(
    id: &'static str,
    /// Container height in px. Chart.js fills the container.
    #[prop(optional)]
    height: Option<Signal<u32>>,
) -> impl IntoView {
    let style = move || {
        height
            .map(|h| format!("height: {}px", h.get()))
            .unwrap_or_default()
    };

    view! {
        <div class="chart-container" style=style>
            <canvas id=id></canvas>
        </div>
    }
}
