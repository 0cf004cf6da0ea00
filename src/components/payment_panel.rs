use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{live_client, use_api};
use crate::components::banner::{Banner, BannerMessage};
use crate::payment::{self, PaymentError, PaymentForm, StripePayment};

/// Transfer form backed by the Stripe Payment Element.
///
/// A fresh payment intent is opened on mount and again after every
/// successful payment. `on_paid` lets the page refresh its list and balance.
#[component]
pub fn PaymentPanel(on_paid: Callback<()>) -> impl IntoView {
    let api = StoredValue::new(use_api());
    let payment = StoredValue::new_local(None::<Rc<StripePayment>>);

    let (amount, set_amount) = signal(String::new());
    let (recipient, set_recipient) = signal(String::new());
    let (reference, set_reference) = signal(String::new());

    let (ready, set_ready) = signal(false);
    let (submitting, set_submitting) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (message, set_message) = signal::<Option<BannerMessage>>(None);

    let mount_element = move || {
        set_ready.set(false);
        let (Some(client), Some(old)) = (live_client(api), payment.try_get_value()) else {
            return;
        };
        if let Some(old) = old {
            old.unmount();
        }
        spawn_local(async move {
            match payment::prepare(&client).await {
                Ok(p) => {
                    log::info!("Payment element ready for intent {}", p.intent_id());
                    // Panel already gone: take the element down with it.
                    if let Some(Some(orphan)) = payment.try_set_value(Some(Rc::new(p))) {
                        orphan.unmount();
                        return;
                    }
                    set_ready.set(true);
                }
                Err(e) => {
                    log::error!("Payment setup failed: {:?}", e);
                    set_error.set(Some(e.to_string()));
                }
            }
        });
    };

    // Element mounts into #payment-element, so wait for the view.
    Effect::new(move |_| mount_element());

    on_cleanup(move || {
        let _ = payment.try_with_value(|p| {
            if let Some(p) = p {
                p.unmount();
            }
        });
    });

    let read_form = move || PaymentForm {
        amount: amount.get_untracked(),
        recipient: recipient.get_untracked(),
        reference: reference.get_untracked(),
    };

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        set_message.set(None);

        let Some(current) = payment.get_value() else {
            set_error.set(Some(PaymentError::NotReady.to_string()));
            return;
        };
        let form = read_form();
        set_submitting.set(true);
        spawn_local(async move {
            match current.submit(&form).await {
                Ok(()) => {
                    set_message.set(Some(BannerMessage::success("Payment Successful!")));
                    set_amount.set(String::new());
                    set_recipient.set(String::new());
                    set_reference.set(String::new());
                    on_paid.try_run(());
                    mount_element();
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_submitting.set(false);
        });
    };

    let checkout = move |_| {
        set_error.set(None);
        let form = read_form();
        let client = api.get_value();
        spawn_local(async move {
            if let Err(e) = payment::start_checkout(&client, &form).await {
                set_error.set(Some(e.to_string()));
            }
        });
    };

    view! {
        <div class="card payment-card">
            <h3>"New Transfer"</h3>
            <Banner message=message on_dismiss=Callback::new(move |_| set_message.set(None)) />
            <form class="payment-form" on:submit=submit>
                <div class="form-group">
                    <label for="amount">"Amount (RM)"</label>
                    <input
                        id="amount"
                        class="input"
                        type="number"
                        min="0.01"
                        step="0.01"
                        placeholder="0.00"
                        prop:value=move || amount.get()
                        on:input=move |ev| set_amount.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="recipientAccount">"Recipient Account"</label>
                    <input
                        id="recipientAccount"
                        class="input"
                        type="text"
                        prop:value=move || recipient.get()
                        on:input=move |ev| set_recipient.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="reference">"Reference"</label>
                    <input
                        id="reference"
                        class="input"
                        type="text"
                        prop:value=move || reference.get()
                        on:input=move |ev| set_reference.set(event_target_value(&ev))
                    />
                </div>

                <div id="payment-element" class="payment-element"></div>
                <Show when=move || !ready.get() && error.get().is_none()>
                    <p class="status-text">"Loading payment form..."</p>
                </Show>

                {move || error.get().map(|e| view! { <div class="payment-errors">{e}</div> })}

                <div class="payment-actions">
                    <button
                        id="payment-submit-btn"
                        class="btn btn-primary"
                        type="submit"
                        disabled=move || submitting.get() || !ready.get()
                    >
                        {move || if submitting.get() { "Processing..." } else { "Proceed to Payment" }}
                    </button>
                    <button
                        class="btn btn-secondary"
                        type="button"
                        on:click=checkout
                        disabled=move || submitting.get()
                    >
                        "Pay with Stripe Checkout"
                    </button>
                </div>
            </form>
        </div>
    }
}
