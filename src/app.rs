use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::api::ApiClient;
use crate::components::shell::Shell;
use crate::config::AppConfig;
use crate::pages::dashboard::DashboardPage;
use crate::pages::edge_devices::EdgeDevicesPage;
use crate::pages::login::LoginPage;
use crate::pages::ml_insights::MlInsightsPage;
use crate::pages::system_management::SystemManagementPage;
use crate::pages::transactions::TransactionsPage;
use crate::session::BrowserStorage;
use crate::theme::{apply_theme, load_theme, ThemeContext};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    provide_context(ApiClient::new(config.api_base.clone()));
    provide_context(config);

    let (dark, set_dark) = signal(load_theme(&BrowserStorage::local()));
    provide_context(ThemeContext { dark, set_dark });

    // Apply theme to DOM whenever the signal changes
    Effect::new(move |_| {
        apply_theme(dark.get());
    });

    view! {
        <Router>
            <Routes fallback=|| view! { <p class="not-found">"Page not found"</p> }>
                <Route path=path!("/") view=LoginPage />
                <Route
                    path=path!("/dashboard")
                    view=|| view! { <Shell><DashboardPage /></Shell> }
                />
                <Route
                    path=path!("/edge-devices")
                    view=|| view! { <Shell><EdgeDevicesPage /></Shell> }
                />
                <Route
                    path=path!("/ml-insights")
                    view=|| view! { <Shell><MlInsightsPage /></Shell> }
                />
                <Route
                    path=path!("/transactions")
                    view=|| view! { <Shell><TransactionsPage /></Shell> }
                />
                <Route
                    path=path!("/system-management")
                    view=|| view! { <Shell require_superadmin=true><SystemManagementPage /></Shell> }
                />
            </Routes>
        </Router>
    }
}
