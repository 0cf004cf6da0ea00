use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::session::{BrowserStorage, Session, SessionStore};
use crate::theme::{save_theme, ThemeContext};

struct NavItem {
    href: &'static str,
    label: &'static str,
    icon: &'static str,
    superadmin_only: bool,
}

const NAV_ITEMS: &[NavItem] = &[
    NavItem { href: "/dashboard", label: "Dashboard", icon: "fa-chart-line", superadmin_only: false },
    NavItem { href: "/edge-devices", label: "Edge Devices", icon: "fa-server", superadmin_only: false },
    NavItem { href: "/ml-insights", label: "ML Insights", icon: "fa-brain", superadmin_only: false },
    NavItem { href: "/transactions", label: "Transactions", icon: "fa-exchange-alt", superadmin_only: false },
    NavItem { href: "/system-management", label: "System Management", icon: "fa-cogs", superadmin_only: true },
];

#[component]
pub fn Sidebar(session: Session) -> impl IntoView {
    let pathname = use_location().pathname;
    let navigate = use_navigate();
    let theme = use_context::<ThemeContext>();

    let links = NAV_ITEMS
        .iter()
        .filter(|item| !item.superadmin_only || session.is_superadmin())
        .map(|item| {
            let href = item.href;
            let class = move || {
                if pathname.get() == href {
                    "nav-link active"
                } else {
                    "nav-link"
                }
            };
            view! {
                <li class="nav-item">
                    <a href=href class=class>
                        <i class=format!("fas {}", item.icon)></i>
                        <span>{item.label}</span>
                    </a>
                </li>
            }
        })
        .collect::<Vec<_>>();

    let toggle_theme = move |_| {
        if let Some(ctx) = theme {
            let dark = !ctx.dark.get_untracked();
            save_theme(&BrowserStorage::local(), dark);
            ctx.set_dark.set(dark);
        }
    };

    let logout = move |_| {
        log::info!("User logged out");
        SessionStore::browser().expire(|path| navigate(path, Default::default()));
    };

    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">"BankEdge"</h1>
                <p class="sidebar-subtitle">"Edge Transaction Console"</p>
            </div>
            <ul class="nav-list">{links}</ul>
            <div class="sidebar-footer">
                <div class="user-info">
                    <span class="user-name">{session.username.clone()}</span>
                    <span class="user-role">{format!("{} \u{00b7} {}", session.role.as_str(), session.location)}</span>
                </div>
                <button class="btn-theme" on:click=toggle_theme>
                    {move || {
                        let dark = theme.map(|t| t.dark.get()).unwrap_or(false);
                        if dark { "Light Mode" } else { "Dark Mode" }
                    }}
                </button>
                <button class="btn-logout" on:click=logout>
                    <i class="fas fa-sign-out-alt"></i>" Logout"
                </button>
            </div>
        </nav>
    }
}
