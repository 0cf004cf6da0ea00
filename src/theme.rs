use leptos::prelude::*;

use crate::session::KeyValueStore;

pub const THEME_KEY: &str = "theme";
const DARK_CLASS: &str = "dark";

#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub dark: ReadSignal<bool>,
    pub set_dark: WriteSignal<bool>,
}

/// Saved preference. Anything other than "dark" means light.
pub fn load_theme(store: &impl KeyValueStore) -> bool {
    store.get(THEME_KEY).as_deref() == Some("dark")
}

pub fn save_theme(store: &impl KeyValueStore, dark: bool) {
    store.set(THEME_KEY, if dark { "dark" } else { "light" });
}

/// Toggle the `dark` class on `<body>`.
pub fn apply_theme(dark: bool) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    let classes = body.class_list();
    let result = if dark {
        classes.add_1(DARK_CLASS)
    } else {
        classes.remove_1(DARK_CLASS)
    };
    if let Err(e) = result {
        log::warn!("Failed to apply theme: {:?}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;

    #[test]
    fn test_default_is_light() {
        assert!(!load_theme(&MemoryStorage::default()));
    }

    #[test]
    fn test_saved_preference_round_trips() {
        let store = MemoryStorage::default();
        save_theme(&store, true);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert!(load_theme(&store));

        save_theme(&store, false);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
        assert!(!load_theme(&store));
    }
}
