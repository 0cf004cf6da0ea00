//! Authenticated page layout.
//!
//! Pages render inside `Shell`, which checks the stored session first.
//! Without a token the visitor goes back to login; a non-superadmin on a
//! superadmin page goes to the dashboard.

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::components::sidebar::Sidebar;
use crate::session::{current_session, Session, HOME_ROUTE, LOGIN_ROUTE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Login,
    Home,
}

pub fn check_access(session: Option<&Session>, require_superadmin: bool) -> Access {
    match session {
        None => Access::Login,
        Some(s) if require_superadmin && !s.is_superadmin() => Access::Home,
        Some(_) => Access::Granted,
    }
}

/// Session of the page being rendered.
pub fn use_session() -> Option<Session> {
    use_context::<Session>().or_else(current_session)
}

#[component]
pub fn Shell(#[prop(optional)] require_superadmin: bool, children: ChildrenFn) -> impl IntoView {
    let session = current_session();

    match (check_access(session.as_ref(), require_superadmin), session) {
        (Access::Granted, Some(session)) => {
            provide_context(session.clone());
            view! {
                <div class="app-layout">
                    <Sidebar session=session />
                    <main class="content">{children()}</main>
                </div>
            }
            .into_any()
        }
        (Access::Home, _) => {
            log::warn!("Superadmin route refused, returning to dashboard");
            view! { <Redirect path=HOME_ROUTE /> }.into_any()
        }
        _ => view! { <Redirect path=LOGIN_ROUTE /> }.into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn session(role: Role) -> Session {
        Session {
            token: "jwt".to_string(),
            username: "admin.kl@bankedge.com".to_string(),
            role,
            location: "KL".to_string(),
        }
    }

    #[test]
    fn test_no_session_goes_to_login() {
        assert_eq!(check_access(None, false), Access::Login);
        assert_eq!(check_access(None, true), Access::Login);
    }

    #[test]
    fn test_admin_refused_superadmin_pages() {
        let admin = session(Role::Admin);
        assert_eq!(check_access(Some(&admin), false), Access::Granted);
        assert_eq!(check_access(Some(&admin), true), Access::Home);
    }

    #[test]
    fn test_superadmin_allowed_everywhere() {
        let root = session(Role::Superadmin);
        assert_eq!(check_access(Some(&root), true), Access::Granted);
    }
}
