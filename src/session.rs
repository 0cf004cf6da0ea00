//! Browser session bookkeeping.
//!
//! The token and user fields live in `sessionStorage` for the lifetime of the
//! tab. Clearing the session always sends the user back to the login route.

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

use thiserror::Error;

use crate::models::{LoginResponse, Role};

pub const TOKEN_KEY: &str = "authToken";
pub const USERNAME_KEY: &str = "username";
pub const ROLE_KEY: &str = "role";
pub const LOCATION_KEY: &str = "userLocation";

pub const LOGIN_ROUTE: &str = "/";
pub const HOME_ROUTE: &str = "/dashboard";

/// Location reported for accounts that are not bound to an edge node.
pub const GLOBAL_LOCATION: &str = "Global HQ";

/// Minimal key/value surface shared by `sessionStorage`, `localStorage` and
/// the in-memory store used in tests.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `web_sys::Storage` wrapper. Missing storage (private mode, no window)
/// behaves as an always-empty store.
#[derive(Clone)]
pub struct BrowserStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
    pub fn session() -> Self {
        let storage = web_sys::window().and_then(|w| w.session_storage().ok().flatten());
        Self { storage }
    }

    pub fn local() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(key, value) {
                log::warn!("Failed to write {} to storage: {:?}", key, e);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Role,
    pub location: String,
}

impl Session {
    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }

    pub fn is_global(&self) -> bool {
        self.location == GLOBAL_LOCATION
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("{0}")]
    Rejected(String),
}

pub struct SessionStore<S = BrowserStorage> {
    storage: S,
}

impl SessionStore<BrowserStorage> {
    pub fn browser() -> Self {
        Self::new(BrowserStorage::session())
    }
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn set_on_login(&self, session: &Session) {
        self.storage.set(TOKEN_KEY, &session.token);
        self.storage.set(USERNAME_KEY, &session.username);
        self.storage.set(ROLE_KEY, session.role.as_str());
        self.storage.set(LOCATION_KEY, &session.location);
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn current(&self) -> Option<Session> {
        let token = self.token()?;
        Some(Session {
            token,
            username: self.storage.get(USERNAME_KEY).unwrap_or_default(),
            role: self
                .storage
                .get(ROLE_KEY)
                .map(|r| Role::parse(&r))
                .unwrap_or_default(),
            location: self
                .storage
                .get(LOCATION_KEY)
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| GLOBAL_LOCATION.to_string()),
        })
    }

    pub fn clear(&self) {
        for key in [TOKEN_KEY, USERNAME_KEY, ROLE_KEY, LOCATION_KEY] {
            self.storage.remove(key);
        }
    }

    /// Store the session carried by a login reply. A reply without a token
    /// leaves storage untouched and yields the server's message.
    pub fn accept_login(&self, username: &str, response: LoginResponse) -> Result<Session, LoginError> {
        let token = match response.access_token.filter(|t| !t.is_empty()) {
            Some(t) => t,
            None => {
                return Err(LoginError::Rejected(
                    response
                        .msg
                        .unwrap_or_else(|| "Invalid credentials".to_string()),
                ))
            }
        };

        let session = Session {
            token,
            username: username.to_string(),
            role: response.role.unwrap_or_default(),
            location: response
                .user_location
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| GLOBAL_LOCATION.to_string()),
        };
        self.set_on_login(&session);
        Ok(session)
    }

    /// Drop the session and hand the login route to `redirect`. Logout and
    /// 401 handling share this path.
    pub fn expire(&self, redirect: impl FnOnce(&str)) {
        self.clear();
        redirect(LOGIN_ROUTE);
    }
}

/// Full page navigation. Used where the router is not reachable (API layer).
pub fn redirect_to(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(path) {
            log::error!("Redirect to {} failed: {:?}", path, e);
        }
    }
}

pub fn current_session() -> Option<Session> {
    SessionStore::browser().current()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn store() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::default())
    }

    fn granted(role: &str, location: &str) -> LoginResponse {
        LoginResponse {
            access_token: Some("jwt-token".to_string()),
            role: Some(Role::parse(role)),
            user_location: Some(location.to_string()),
            msg: None,
        }
    }

    #[test]
    fn test_valid_login_stores_token() {
        let store = store();
        let session = store
            .accept_login("admin.kl@bankedge.com", granted("admin", "KL"))
            .unwrap();

        assert_eq!(session.location, "KL");
        assert_eq!(store.token().as_deref(), Some("jwt-token"));
        assert_eq!(store.current(), Some(session));
    }

    #[test]
    fn test_invalid_login_stores_nothing() {
        let store = store();
        let response = LoginResponse {
            msg: Some("Bad username or password".to_string()),
            ..Default::default()
        };
        let err = store.accept_login("nobody", response).unwrap_err();

        assert_eq!(err.to_string(), "Bad username or password");
        assert!(store.token().is_none());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_invalid_login_without_message_uses_default() {
        let store = store();
        let err = store
            .accept_login("nobody", LoginResponse::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_empty_location_defaults_to_global() {
        let store = store();
        let session = store
            .accept_login("superadmin@bankedge.com", granted("superadmin", ""))
            .unwrap();
        assert!(session.is_superadmin());
        assert!(session.is_global());
    }

    #[test]
    fn test_expire_clears_all_fields_and_redirects_to_login() {
        let store = store();
        store
            .accept_login("admin.kl@bankedge.com", granted("admin", "KL"))
            .unwrap();

        let redirected = Cell::new(None);
        store.expire(|path| redirected.set(Some(path.to_string())));

        assert_eq!(redirected.take().as_deref(), Some(LOGIN_ROUTE));
        for key in [TOKEN_KEY, USERNAME_KEY, ROLE_KEY, LOCATION_KEY] {
            assert!(store.storage.get(key).is_none(), "{} still set", key);
        }
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let store = store();
        store.storage.set(TOKEN_KEY, "");
        assert!(!store.is_authenticated());
    }
}
