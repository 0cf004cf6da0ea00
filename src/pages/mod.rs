pub mod dashboard;
pub mod edge_devices;
pub mod login;
pub mod ml_insights;
pub mod system_management;
pub mod transactions;

use leptos::prelude::*;

use crate::api::ApiError;
use crate::session::Session;

/// Title and subtitle of a page whose scope depends on the user's location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub title: String,
    pub subtitle: String,
}

impl Heading {
    /// `global` applies to Global HQ users (and when no session is known);
    /// other users see `local` built from their location.
    pub fn for_session(
        session: Option<&Session>,
        global: (&str, &str),
        local: impl FnOnce(&str) -> (String, String),
    ) -> Self {
        match session.filter(|s| !s.is_global()) {
            Some(s) => {
                let (title, subtitle) = local(&s.location);
                Self { title, subtitle }
            }
            None => Self {
                title: global.0.to_string(),
                subtitle: global.1.to_string(),
            },
        }
    }
}

/// Log a failed fetch and return the text to show inline. A 401 has already
/// cleared the session and left the page, so it yields nothing.
pub fn fetch_error(what: &str, err: ApiError) -> Option<String> {
    match err {
        ApiError::Unauthorized => None,
        other => {
            log::error!("Error fetching {}: {}", what, other);
            Some(other.to_string())
        }
    }
}

/// Settle a poll reply. A fresh value clears any earlier error; a failure
/// leaves the last value on screen.
pub fn poll_result<T>(what: &str, result: Result<T, ApiError>, set_error: WriteSignal<Option<String>>) -> Option<T> {
    match result {
        Ok(value) => {
            set_error.set(None);
            Some(value)
        }
        Err(e) => {
            set_error.set(fetch_error(what, e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_poll_success_clears_stale_error() {
        let owner = Owner::new();
        owner.with(|| {
            let (error, set_error) = signal(Some("Network error: offline".to_string()));

            assert_eq!(poll_result("devices", Ok(3), set_error), Some(3));
            assert_eq!(error.get_untracked(), None);

            let failed: Option<u32> = poll_result("devices", Err(ApiError::Network("down".to_string())), set_error);
            assert_eq!(failed, None);
            assert_eq!(error.get_untracked().as_deref(), Some("Network error: down"));
        });
    }

    fn session(location: &str) -> Session {
        Session {
            token: "jwt".to_string(),
            username: "ops@bankedge.com".to_string(),
            role: Role::Admin,
            location: location.to_string(),
        }
    }

    fn heading(session: Option<&Session>) -> Heading {
        Heading::for_session(session, ("Global View", "All nodes"), |loc| {
            (format!("View - {}", loc), format!("Node {}", loc))
        })
    }

    #[test]
    fn test_global_hq_sees_global_heading() {
        let hq = session("Global HQ");
        assert_eq!(heading(Some(&hq)).title, "Global View");
        assert_eq!(heading(None).subtitle, "All nodes");
    }

    #[test]
    fn test_branch_sees_its_location() {
        let kl = session("Kuala Lumpur");
        let h = heading(Some(&kl));
        assert_eq!(h.title, "View - Kuala Lumpur");
        assert_eq!(h.subtitle, "Node Kuala Lumpur");
    }

    #[test]
    fn test_unauthorized_fetch_is_silent() {
        assert_eq!(fetch_error("devices", ApiError::Unauthorized), None);
        assert_eq!(
            fetch_error("devices", ApiError::Network("offline".to_string())),
            Some(ApiError::Network("offline".to_string()).to_string())
        );
    }
}
