use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::api::{use_api, ApiError};
use crate::components::password_input::PasswordInput;
use crate::models::LoginResponse;
use crate::session::{KeyValueStore, Session, SessionStore, HOME_ROUTE};
use crate::validation::check_credentials;

const LOGIN_FAILED: &str = "Login failed. Please try again.";

/// Turn the login reply into a stored session or the message to show.
/// Nothing is stored unless the reply carries a token.
pub fn finish_login<S: KeyValueStore>(
    store: &SessionStore<S>,
    username: &str,
    reply: Result<LoginResponse, ApiError>,
) -> Result<Session, String> {
    match reply {
        Ok(response) => store
            .accept_login(username, response)
            .map_err(|e| e.to_string()),
        Err(ApiError::Server { message, .. }) => Err(message),
        Err(e) => {
            log::error!("Login request failed: {}", e);
            Err(LOGIN_FAILED.to_string())
        }
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    if SessionStore::browser().is_authenticated() {
        return view! { <Redirect path=HOME_ROUTE /> }.into_any();
    }

    let api = StoredValue::new(use_api());
    let navigate = use_navigate();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);

        let user = username.get_untracked().trim().to_string();
        let pass = password.get_untracked();
        if let Err(e) = check_credentials(&user, &pass) {
            set_error.set(Some(e.to_string()));
            return;
        }

        set_loading.set(true);
        let navigate = navigate.clone();
        let client = api.get_value();
        spawn_local(async move {
            let reply = client.login(&user, &pass).await;
            match finish_login(&SessionStore::browser(), &user, reply) {
                Ok(session) => {
                    log::info!("Signed in as {} ({})", session.username, session.role.as_str());
                    navigate(HOME_ROUTE, Default::default());
                }
                Err(msg) => {
                    set_error.set(Some(msg));
                    set_loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <div class="login-header">
                    <i class="fas fa-university login-logo"></i>
                    <h1>"BankEdge"</h1>
                    <p>"Sign in to the transaction console"</p>
                </div>
                <form class="login-form" on:submit=submit>
                    <div class="form-group">
                        <label for="username">"Username"</label>
                        <input
                            id="username"
                            class="input"
                            type="text"
                            autocomplete="username"
                            placeholder="admin@bankedge.com"
                            prop:value=move || username.get()
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                            disabled=move || loading.get()
                        />
                    </div>
                    <div class="form-group">
                        <label for="password">"Password"</label>
                        <PasswordInput
                            id="password"
                            placeholder="Password"
                            value=password
                            set_value=set_password
                            disabled=Signal::derive(move || loading.get())
                        />
                    </div>
                    {move || error.get().map(|e| view! { <div class="error-message">{e}</div> })}
                    <button class="btn btn-primary btn-block" type="submit" disabled=move || loading.get()>
                        {move || if loading.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
            </div>
        </div>
    }
    .into_any()
}
