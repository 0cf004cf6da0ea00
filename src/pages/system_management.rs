use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{live_client, use_api};
use crate::components::banner::{Banner, BannerMessage};
use crate::components::modal::Modal;
use crate::components::page_header::PageHeader;
use crate::components::password_input::PasswordInput;
use crate::config::use_config;
use crate::format::{format_timestamp, or_dash};
use crate::models::{AdminUser, AuditLog, Device, MlModel, NewUser, Role, SystemData, UserUpdate};
use crate::pages::fetch_error;
use crate::poller::use_poller;
use crate::validation::{check_location, check_new_password, check_password_change, ValidationError};

const ROUTE: &str = "/system-management";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SysTab {
    Admins,
    EdgeNodes,
    MlModels,
    AuditLogs,
}

impl SysTab {
    const ALL: [SysTab; 4] = [SysTab::Admins, SysTab::EdgeNodes, SysTab::MlModels, SysTab::AuditLogs];

    fn label(&self) -> &'static str {
        match self {
            SysTab::Admins => "Admin Users",
            SysTab::EdgeNodes => "Edge Nodes",
            SysTab::MlModels => "ML Models",
            SysTab::AuditLogs => "Audit Logs",
        }
    }
}

/// Locations a new admin can be assigned to, taken from the known edge nodes.
fn location_options(nodes: &[Device]) -> Vec<String> {
    let mut locations: Vec<String> = nodes
        .iter()
        .map(|n| n.location.clone())
        .filter(|l| !l.is_empty())
        .collect();
    locations.sort();
    locations.dedup();
    locations
}

fn new_user(location: &str, password: &str) -> Result<NewUser, ValidationError> {
    check_location(location)?;
    check_new_password(password)?;
    Ok(NewUser {
        location: location.trim().to_string(),
        password: password.to_string(),
    })
}

fn user_update(role: Role, password: &str, confirm: &str) -> Result<UserUpdate, ValidationError> {
    Ok(UserUpdate {
        role,
        password: check_password_change(password, confirm)?,
    })
}

#[component]
pub fn SystemManagementPage() -> impl IntoView {
    let api = StoredValue::new(use_api());
    let config = use_config();

    let (data, set_data) = signal(SystemData::default());
    let (tab, set_tab) = signal(SysTab::Admins);
    let (banner, set_banner) = signal::<Option<BannerMessage>>(None);
    let (adding, set_adding) = signal(false);
    let (editing, set_editing) = signal::<Option<AdminUser>>(None);

    let fetch = move || {
        let Some(client) = live_client(api) else {
            return;
        };
        spawn_local(async move {
            match client.system_data().await {
                Ok(d) => set_data.set(d),
                Err(e) => {
                    if let Some(msg) = fetch_error("system data", e) {
                        set_banner.set(Some(BannerMessage::error(msg)));
                    }
                }
            }
        });
    };
    use_poller(ROUTE, config.polling.system_ms, fetch);

    let delete_user = move |user: AdminUser| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Are you sure you want to delete this user?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let client = api.get_value();
        spawn_local(async move {
            match client.delete_user(user.id).await {
                Ok(_) => {
                    log::info!("Deleted user {}", user.username);
                    fetch();
                }
                Err(e) => {
                    if let Some(msg) = fetch_error("user deletion", e) {
                        set_banner.set(Some(BannerMessage::error(msg)));
                    }
                }
            }
        });
    };

    let on_created = Callback::new(move |username: String| {
        set_adding.set(false);
        set_banner.set(Some(BannerMessage::success(format!("Admin account created: {}", username))));
        fetch();
    });
    let on_updated = Callback::new(move |_: ()| {
        set_editing.set(None);
        set_banner.set(Some(BannerMessage::success("Admin account updated successfully.")));
        fetch();
    });

    view! {
        <div class="page system-management-page">
            <PageHeader
                title="System Management"
                subtitle="Administer users, edge nodes and ML models"
                on_refresh=Callback::new(move |_| fetch())
            >
                <button class="btn btn-primary" on:click=move |_| set_adding.set(true)>
                    <i class="fas fa-user-plus"></i>" Add Admin"
                </button>
            </PageHeader>

            <Banner message=banner on_dismiss=Callback::new(move |_| set_banner.set(None)) />

            <div class="tab-list">
                {SysTab::ALL
                    .into_iter()
                    .map(|t| view! {
                        <button
                            class=move || if tab.get() == t { "tab-trigger active" } else { "tab-trigger" }
                            on:click=move |_| set_tab.set(t)
                        >
                            {t.label()}
                        </button>
                    })
                    .collect_view()}
            </div>

            <div class="card tab-content">
                {move || match tab.get() {
                    SysTab::Admins => view! {
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th>"Username"</th>
                                    <th>"Role"</th>
                                    <th>"Last Login"</th>
                                    <th>"Status"</th>
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {data.with(|d| {
                                    d.admins
                                        .iter()
                                        .map(|admin| admin_row(admin, set_editing, delete_user))
                                        .collect_view()
                                })}
                            </tbody>
                        </table>
                    }
                    .into_any(),
                    SysTab::EdgeNodes => view! {
                        <div class="decision-list">
                            {data.with(|d| d.edge_nodes.iter().map(node_item).collect_view())}
                        </div>
                    }
                    .into_any(),
                    SysTab::MlModels => view! {
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th>"Version"</th>
                                    <th>"Uploaded"</th>
                                    <th>"Uploaded By"</th>
                                    <th>"Accuracy"</th>
                                    <th>"Deployed"</th>
                                    <th>"Status"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {data.with(|d| {
                                    let nodes = d.edge_nodes.len();
                                    d.ml_models.iter().map(|m| model_row(m, nodes)).collect_view()
                                })}
                            </tbody>
                        </table>
                    }
                    .into_any(),
                    SysTab::AuditLogs => view! {
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th>"Time"</th>
                                    <th>"User"</th>
                                    <th>"Action"</th>
                                    <th>"Details"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {data.with(|d| d.audit_logs.iter().map(audit_row).collect_view())}
                            </tbody>
                        </table>
                    }
                    .into_any(),
                }}
            </div>

            <Show when=move || adding.get()>
                <AddAdminModal
                    locations=Signal::derive(move || data.with(|d| location_options(&d.edge_nodes)))
                    on_close=Callback::new(move |_| set_adding.set(false))
                    on_created=on_created
                />
            </Show>

            {move || editing.get().map(|user| view! {
                <EditAdminModal
                    user=user
                    on_close=Callback::new(move |_| set_editing.set(None))
                    on_updated=on_updated
                />
            })}
        </div>
    }
}

fn admin_row(
    admin: &AdminUser,
    set_editing: WriteSignal<Option<AdminUser>>,
    delete_user: impl Fn(AdminUser) + Copy + 'static,
) -> impl IntoView {
    let role_class = if admin.role == Role::Superadmin {
        "sync-status-badge synced"
    } else {
        "sync-status-badge"
    };
    let last_login = match admin.last_login.as_deref() {
        None | Some("Never") => "Never".to_string(),
        Some(ts) => format_timestamp(Some(ts)),
    };
    let for_edit = admin.clone();
    let for_delete = admin.clone();

    view! {
        <tr>
            <td><strong>{admin.username.clone()}</strong></td>
            <td><span class=role_class>{admin.role.as_str()}</span></td>
            <td>{last_login}</td>
            <td><span class=format!("status-badge {}", admin.status)>{admin.status.clone()}</span></td>
            <td class="action-cell">
                <button class="action-button" on:click=move |_| set_editing.set(Some(for_edit.clone()))>
                    "Edit"
                </button>
                <button class="action-button delete" on:click=move |_| delete_user(for_delete.clone())>
                    "Delete"
                </button>
            </td>
        </tr>
    }
}

fn node_item(node: &Device) -> impl IntoView {
    let online = node.status.is_online();
    let (kind, icon) = if online {
        ("edge", "fa-server")
    } else {
        ("cloud", "fa-exclamation-triangle")
    };

    view! {
        <div class="decision-item">
            <div class="decision-item-header">
                <div class="decision-info">
                    <div class=format!("decision-icon {}", kind)>
                        <i class=format!("fas {}", icon)></i>
                    </div>
                    <div class="decision-details">
                        <h4>{node.name.clone()}</h4>
                        <p>{node.location.clone()}</p>
                    </div>
                </div>
                <div class="decision-meta">
                    <div class=format!("badge {}", kind)>{node.status.label()}</div>
                </div>
            </div>
            <div class="device-card-stats">
                <div>"CPU "<p>{format!("{:.1}%", node.load)}</p></div>
                <div>"Latency "<p>{format!("{:.0}ms", node.latency)}</p></div>
                <div>
                    "Sync "
                    <span class=format!("sync-status-badge {}", node.sync_status)>{node.sync_status.clone()}</span>
                </div>
            </div>
        </div>
    }
}

fn model_row(model: &MlModel, node_count: usize) -> impl IntoView {
    let accuracy = if model.accuracy.is_empty() || model.accuracy.ends_with('%') {
        model.accuracy.clone()
    } else {
        format!("{}%", model.accuracy)
    };
    let deployed = format!("{}/{}", model.deployed_nodes.unwrap_or(0), node_count);

    view! {
        <tr>
            <td><strong>{model.version.clone()}</strong></td>
            <td>{format_timestamp(model.uploaded_at.as_deref())}</td>
            <td>{or_dash(model.uploaded_by.as_deref())}</td>
            <td><span class="value-green">{accuracy}</span></td>
            <td>{deployed}</td>
            <td><span class=format!("status-badge {}", model.status)>{model.status.clone()}</span></td>
        </tr>
    }
}

fn audit_row(entry: &AuditLog) -> impl IntoView {
    view! {
        <tr>
            <td class="small"><i class="fas fa-clock"></i>" "{format_timestamp(Some(&entry.timestamp))}</td>
            <td><strong>{entry.user.clone()}</strong></td>
            <td><span class="sync-status-badge">{entry.action.clone()}</span></td>
            <td>{or_dash(entry.details.as_deref())}</td>
        </tr>
    }
}

#[component]
fn AddAdminModal(
    locations: Signal<Vec<String>>,
    on_close: Callback<()>,
    on_created: Callback<String>,
) -> impl IntoView {
    let api = StoredValue::new(use_api());
    let (location, set_location) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        let user = match new_user(&location.get_untracked(), &password.get_untracked()) {
            Ok(u) => u,
            Err(e) => {
                set_error.set(Some(e.to_string()));
                return;
            }
        };
        set_saving.set(true);
        let client = api.get_value();
        spawn_local(async move {
            match client.create_user(&user).await {
                Ok(reply) => {
                    let username = reply.username.unwrap_or_default();
                    log::info!("Admin account created: {}", username);
                    on_created.try_run(username);
                }
                Err(e) => set_error.set(fetch_error("user creation", e)),
            }
            set_saving.set(false);
        });
    };

    view! {
        <Modal title="Add Admin" on_close=on_close>
            <form class="modal-form" on:submit=submit>
                <div class="form-group">
                    <label for="newAdminLocation">"Location"</label>
                    <select
                        id="newAdminLocation"
                        class="input"
                        on:change=move |ev| set_location.set(event_target_value(&ev))
                        prop:value=move || location.get()
                    >
                        <option value="">"Select a location"</option>
                        {move || locations.get().into_iter().map(|l| {
                            let value = l.clone();
                            view! { <option value=value>{l}</option> }
                        }).collect_view()}
                    </select>
                </div>
                <div class="form-group">
                    <label for="newAdminPassword">"Password"</label>
                    <PasswordInput id="newAdminPassword" placeholder="Password" value=password set_value=set_password />
                </div>
                {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}
                <div class="modal-actions">
                    <button type="button" class="btn btn-secondary" on:click=move |_| on_close.run(())>"Cancel"</button>
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Creating..." } else { "Create Admin" }}
                    </button>
                </div>
            </form>
        </Modal>
    }
}

#[component]
fn EditAdminModal(user: AdminUser, on_close: Callback<()>, on_updated: Callback<()>) -> impl IntoView {
    let api = StoredValue::new(use_api());
    let user_id = user.id;
    let (role, set_role) = signal(user.role);
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        let update = match user_update(role.get_untracked(), &password.get_untracked(), &confirm.get_untracked()) {
            Ok(u) => u,
            Err(e) => {
                set_error.set(Some(e.to_string()));
                return;
            }
        };
        set_saving.set(true);
        let client = api.get_value();
        spawn_local(async move {
            match client.update_user(user_id, &update).await {
                Ok(_) => {
                    on_updated.try_run(());
                }
                Err(e) => set_error.set(fetch_error("user update", e)),
            }
            set_saving.set(false);
        });
    };

    view! {
        <Modal title="Edit Admin" on_close=on_close>
            <form class="modal-form" on:submit=submit>
                <div class="form-group">
                    <label for="editAdminUsername">"Username"</label>
                    <input id="editAdminUsername" class="input" type="text" readonly=true prop:value=user.username.clone() />
                </div>
                <div class="form-group">
                    <label for="editAdminRole">"Role"</label>
                    <select
                        id="editAdminRole"
                        class="input"
                        prop:value=move || role.get().as_str()
                        on:change=move |ev| set_role.set(Role::parse(&event_target_value(&ev)))
                    >
                        <option value="admin">"admin"</option>
                        <option value="superadmin">"superadmin"</option>
                    </select>
                </div>
                <div class="form-group">
                    <label for="editAdminPassword">"New Password"</label>
                    <PasswordInput
                        id="editAdminPassword"
                        placeholder="Leave blank to keep current"
                        value=password
                        set_value=set_password
                    />
                </div>
                <div class="form-group">
                    <label for="editAdminConfirmPassword">"Confirm Password"</label>
                    <PasswordInput
                        id="editAdminConfirmPassword"
                        placeholder="Confirm new password"
                        value=confirm
                        set_value=set_confirm
                    />
                </div>
                {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}
                <div class="modal-actions">
                    <button type="button" class="btn btn-secondary" on:click=move |_| on_close.run(())>"Cancel"</button>
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Save Changes" }}
                    </button>
                </div>
            </form>
        </Modal>
    }
}
