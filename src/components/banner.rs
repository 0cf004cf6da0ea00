use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BannerMessage {
    pub kind: BannerKind,
    pub text: String,
}

impl BannerMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            text: text.into(),
        }
    }
}

/// Dismissable alert strip. Renders nothing while `message` is `None`.
#[component]
pub fn Banner(
    #[prop(into)] message: Signal<Option<BannerMessage>>,
    on_dismiss: Callback<()>,
) -> impl IntoView {
    move || {
        message.get().map(|m| {
            let class = match m.kind {
                BannerKind::Success => "alert-banner success",
                BannerKind::Error => "alert-banner error",
            };
            view! {
                <div class=class>
                    <span>{m.text}</span>
                    <button class="alert-close" on:click=move |_| on_dismiss.run(())>"\u{00d7}"</button>
                </div>
            }
        })
    }
}
