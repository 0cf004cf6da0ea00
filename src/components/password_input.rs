use leptos::prelude::*;

/// Password field with a show/hide toggle.
#[component]
pub fn PasswordInput(
    id: &'static str,
    #[prop(into)] placeholder: String,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
    #[prop(optional)] disabled: Option<Signal<bool>>,
) -> impl IntoView {
    let (visible, set_visible) = signal(false);

    view! {
        <div class="password-wrapper">
            <input
                id=id
                class="input"
                type=move || if visible.get() { "text" } else { "password" }
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| set_value.set(event_target_value(&ev))
                disabled=move || disabled.is_some_and(|d| d.get())
            />
            <button
                type="button"
                class="password-toggle"
                title=move || if visible.get() { "Hide password" } else { "Show password" }
                on:click=move |_| set_visible.update(|v| *v = !*v)
            >
                <i class=move || if visible.get() { "fas fa-eye-slash" } else { "fas fa-eye" }></i>
            </button>
        </div>
    }
}
