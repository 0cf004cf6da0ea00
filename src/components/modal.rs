use leptos::prelude::*;

/// Overlay dialog. Clicking the backdrop or the close button calls `on_close`.
#[component]
pub fn Modal(
    #[prop(into)] title: String,
    on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="modal" on:click=move |_| on_close.run(())>
            <div class="modal-content" on:click=|ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h3>{title}</h3>
                    <button class="modal-close" on:click=move |_| on_close.run(())>"\u{00d7}"</button>
                </div>
                <div class="modal-body">{children()}</div>
            </div>
        </div>
    }
}
