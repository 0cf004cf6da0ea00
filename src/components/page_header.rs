use leptos::prelude::*;

/// Page title row with a manual refresh button.
#[component]
pub fn PageHeader(
    #[prop(into)] title: String,
    #[prop(into)] subtitle: String,
    on_refresh: Callback<()>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="page-header">
            <div>
                <h1>{title}</h1>
                <p class="page-description">{subtitle}</p>
            </div>
            <div class="page-header-actions">
                {children.map(|c| c())}
                <button class="btn btn-secondary" on:click=move |_| on_refresh.run(())>
                    <i class="fas fa-sync-alt"></i>" Refresh"
                </button>
            </div>
        </div>
    }
}
