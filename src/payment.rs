//! Stripe Payment Element flow for the transactions page.
//!
//! `prepare` loads the publishable key, opens a payment intent on the server
//! and mounts the hosted form. `complete_payment` then pushes the form
//! details to the intent, confirms through Stripe.js and records the outcome
//! with the backend. Once an intent exists a failure is still recorded.

use async_trait::async_trait;
use js_sys::{Object, Promise, Reflect};
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::api::{ApiClient, ApiError};
use crate::models::PaymentDetails;
use crate::session::redirect_to;
use crate::validation::{parse_amount, ValidationError};

pub const PAYMENT_ELEMENT_SELECTOR: &str = "#payment-element";

#[wasm_bindgen]
extern "C" {
    pub type Stripe;

    #[wasm_bindgen(js_name = Stripe, catch)]
    fn init_stripe(publishable_key: &str) -> Result<Stripe, JsValue>;

    #[wasm_bindgen(method)]
    fn elements(this: &Stripe, options: &JsValue) -> StripeElements;

    #[wasm_bindgen(method, js_name = confirmPayment)]
    fn confirm_payment(this: &Stripe, options: &JsValue) -> Promise;

    pub type StripeElements;

    #[wasm_bindgen(method)]
    fn create(this: &StripeElements, kind: &str, options: &JsValue) -> PaymentElement;

    pub type PaymentElement;

    #[wasm_bindgen(method)]
    fn mount(this: &PaymentElement, selector: &str);

    #[wasm_bindgen(method)]
    fn destroy(this: &PaymentElement);
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaymentError {
    #[error("Failed to load payment system. Please refresh.")]
    Setup(String),

    #[error("Payment form is not ready yet")]
    NotReady,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Declined(String),
}

impl From<PaymentError> for String {
    fn from(err: PaymentError) -> Self {
        err.to_string()
    }
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| "An unexpected error occurred.".to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, PaymentError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| PaymentError::Setup(e.to_string()))
}

// -- Form input --

/// Raw text from the payment form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentForm {
    pub amount: String,
    pub recipient: String,
    pub reference: String,
}

impl PaymentForm {
    pub fn details(&self) -> Result<PaymentDetails, ValidationError> {
        Ok(PaymentDetails {
            amount: parse_amount(&self.amount)?,
            recipient_account: self.recipient.trim().to_string(),
            reference: self.reference.trim().to_string(),
        })
    }
}

// -- Flow --

/// Steps after the form is mounted. Split out so the ordering and the
/// failure recording can be exercised without Stripe.js.
#[async_trait(?Send)]
pub trait PaymentSteps {
    async fn update_intent(&self, intent_id: &str, details: &PaymentDetails) -> Result<(), PaymentError>;
    async fn confirm(&self) -> Result<(), PaymentError>;
    async fn record(&self, intent_id: &str) -> Result<(), PaymentError>;
}

pub async fn complete_payment<S: PaymentSteps + ?Sized>(
    steps: &S,
    intent_id: &str,
    details: &PaymentDetails,
) -> Result<(), PaymentError> {
    let attempt = async {
        steps.update_intent(intent_id, details).await?;
        steps.confirm().await
    }
    .await;

    if intent_id.is_empty() {
        return attempt;
    }

    match &attempt {
        Ok(()) => log::info!("Payment {} confirmed", intent_id),
        Err(e) => log::warn!("Payment {} failed: {}", intent_id, e),
    }
    if let Err(e) = steps.record(intent_id).await {
        log::error!("Failed to record payment result for {}: {}", intent_id, e);
    }
    attempt
}

/// Mounted Payment Element bound to one server-side intent.
pub struct StripePayment {
    api: ApiClient,
    stripe: Stripe,
    elements: StripeElements,
    element: PaymentElement,
    intent_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementsOptions<'a> {
    client_secret: &'a str,
    appearance: Appearance,
}

#[derive(Serialize)]
struct Appearance {
    theme: &'static str,
    labels: &'static str,
}

#[derive(Serialize)]
struct PaymentElementOptions {
    layout: &'static str,
}

pub async fn prepare(api: &ApiClient) -> Result<StripePayment, PaymentError> {
    let config = api.stripe_config().await?;
    if config.publishable_key.is_empty() {
        return Err(PaymentError::Setup("publishable key missing".to_string()));
    }
    let stripe = init_stripe(&config.publishable_key).map_err(|e| PaymentError::Setup(js_message(&e)))?;

    let handle = api.init_payment_intent().await?;
    log::debug!("Payment intent {} opened", handle.payment_intent_id);

    let elements = stripe.elements(&to_js(&ElementsOptions {
        client_secret: &handle.client_secret,
        appearance: Appearance {
            theme: "stripe",
            labels: "floating",
        },
    })?);
    let element = elements.create("payment", &to_js(&PaymentElementOptions { layout: "tabs" })?);
    element.mount(PAYMENT_ELEMENT_SELECTOR);

    Ok(StripePayment {
        api: api.clone(),
        stripe,
        elements,
        element,
        intent_id: handle.payment_intent_id,
    })
}

impl StripePayment {
    pub fn intent_id(&self) -> &str {
        &self.intent_id
    }

    pub async fn submit(&self, form: &PaymentForm) -> Result<(), PaymentError> {
        let details = form.details()?;
        complete_payment(self, &self.intent_id, &details).await
    }

    pub fn unmount(&self) {
        self.element.destroy();
    }

    fn confirm_options(&self) -> Result<JsValue, PaymentError> {
        let return_url = web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default();

        let params = Object::new();
        let options = Object::new();
        let set = |target: &Object, key: &str, value: &JsValue| {
            Reflect::set(target, &JsValue::from_str(key), value)
                .map(|_| ())
                .map_err(|e| PaymentError::Setup(js_message(&e)))
        };
        set(&params, "return_url", &JsValue::from_str(&return_url))?;
        let elements: &JsValue = self.elements.as_ref();
        set(&options, "elements", elements)?;
        set(&options, "confirmParams", &params)?;
        set(&options, "redirect", &JsValue::from_str("if_required"))?;
        Ok(options.into())
    }
}

#[async_trait(?Send)]
impl PaymentSteps for StripePayment {
    async fn update_intent(&self, intent_id: &str, details: &PaymentDetails) -> Result<(), PaymentError> {
        self.api.update_payment_intent(intent_id, details).await?;
        Ok(())
    }

    async fn confirm(&self) -> Result<(), PaymentError> {
        let promise = self.stripe.confirm_payment(&self.confirm_options()?);
        let result = JsFuture::from(promise)
            .await
            .map_err(|e| PaymentError::Declined(js_message(&e)))?;

        let error = Reflect::get(&result, &JsValue::from_str("error")).unwrap_or(JsValue::UNDEFINED);
        if error.is_undefined() || error.is_null() {
            Ok(())
        } else {
            Err(PaymentError::Declined(js_message(&error)))
        }
    }

    async fn record(&self, intent_id: &str) -> Result<(), PaymentError> {
        self.api.record_payment_result(intent_id).await?;
        Ok(())
    }
}

// -- Redirect return --

/// Query parameters Stripe appends when it returns from a 3-D Secure redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectReturn {
    pub payment_intent: String,
    pub redirect_status: String,
}

impl RedirectReturn {
    pub fn succeeded(&self) -> bool {
        self.redirect_status == "succeeded"
    }

    pub fn banner(&self) -> &'static str {
        if self.succeeded() {
            "Payment Successful!"
        } else {
            "Payment Failed or Canceled."
        }
    }
}

pub fn parse_redirect_params(search: &str) -> Option<RedirectReturn> {
    let mut payment_intent = None;
    let mut redirect_status = None;
    for (key, value) in url::form_urlencoded::parse(search.trim_start_matches('?').as_bytes()) {
        match key.as_ref() {
            "payment_intent" => payment_intent = Some(value.into_owned()),
            "redirect_status" => redirect_status = Some(value.into_owned()),
            _ => {}
        }
    }
    Some(RedirectReturn {
        payment_intent: payment_intent.filter(|v| !v.is_empty())?,
        redirect_status: redirect_status.filter(|v| !v.is_empty())?,
    })
}

/// Read and strip the redirect parameters from the address bar.
pub fn take_redirect_return() -> Option<RedirectReturn> {
    let window = web_sys::window()?;
    let location = window.location();
    let found = parse_redirect_params(&location.search().ok()?)?;

    let path = location.pathname().unwrap_or_default();
    if let Ok(history) = window.history() {
        if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(&path)) {
            log::warn!("Could not clear payment redirect params: {:?}", e);
        }
    }
    Some(found)
}

pub async fn record_redirect(api: &ApiClient, redirect: &RedirectReturn) -> Result<(), PaymentError> {
    log::info!(
        "Recording redirected payment {} ({})",
        redirect.payment_intent,
        redirect.redirect_status
    );
    api.record_payment_result(&redirect.payment_intent).await?;
    Ok(())
}

// -- Hosted checkout --

pub async fn start_checkout(api: &ApiClient, form: &PaymentForm) -> Result<(), PaymentError> {
    let details = form.details()?;
    let session = api.create_checkout_session(&details).await?;
    if session.url.is_empty() {
        return Err(PaymentError::Setup("checkout session has no url".to_string()));
    }
    redirect_to(&session.url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeSteps {
        calls: RefCell<Vec<String>>,
        fail_update: bool,
        decline: bool,
    }

    #[async_trait(?Send)]
    impl PaymentSteps for FakeSteps {
        async fn update_intent(&self, intent_id: &str, details: &PaymentDetails) -> Result<(), PaymentError> {
            self.calls
                .borrow_mut()
                .push(format!("update {} {}", intent_id, details.amount));
            if self.fail_update {
                return Err(PaymentError::Api(ApiError::Server {
                    status: 400,
                    message: "Failed to update payment details".to_string(),
                }));
            }
            Ok(())
        }

        async fn confirm(&self) -> Result<(), PaymentError> {
            self.calls.borrow_mut().push("confirm".to_string());
            if self.decline {
                return Err(PaymentError::Declined("Your card was declined.".to_string()));
            }
            Ok(())
        }

        async fn record(&self, intent_id: &str) -> Result<(), PaymentError> {
            self.calls.borrow_mut().push(format!("record {}", intent_id));
            Ok(())
        }
    }

    fn details() -> PaymentDetails {
        PaymentDetails {
            amount: 150.0,
            recipient_account: "1234-5678".to_string(),
            reference: "Rent".to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_payment_runs_steps_in_order() {
        let steps = FakeSteps::default();
        complete_payment(&steps, "pi_1", &details()).await.unwrap();
        assert_eq!(
            *steps.calls.borrow(),
            vec!["update pi_1 150", "confirm", "record pi_1"]
        );
    }

    #[tokio::test]
    async fn test_declined_payment_is_still_recorded() {
        let steps = FakeSteps {
            decline: true,
            ..Default::default()
        };
        let err = complete_payment(&steps, "pi_2", &details()).await.unwrap_err();
        assert_eq!(err.to_string(), "Your card was declined.");
        assert_eq!(steps.calls.borrow().last().map(String::as_str), Some("record pi_2"));
    }

    #[tokio::test]
    async fn test_failed_update_skips_confirm_but_records() {
        let steps = FakeSteps {
            fail_update: true,
            ..Default::default()
        };
        let err = complete_payment(&steps, "pi_3", &details()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to update payment details");
        assert_eq!(*steps.calls.borrow(), vec!["update pi_3 150", "record pi_3"]);
    }

    #[tokio::test]
    async fn test_no_intent_means_nothing_recorded() {
        let steps = FakeSteps {
            decline: true,
            ..Default::default()
        };
        assert!(complete_payment(&steps, "", &details()).await.is_err());
        assert!(!steps.calls.borrow().iter().any(|c| c.starts_with("record")));
    }

    #[test]
    fn test_form_details_validate_amount() {
        let form = PaymentForm {
            amount: "abc".to_string(),
            recipient: " 1234 ".to_string(),
            reference: String::new(),
        };
        assert_eq!(form.details(), Err(ValidationError::InvalidAmount));

        let form = PaymentForm {
            amount: "25.50".to_string(),
            ..form
        };
        let details = form.details().unwrap();
        assert_eq!(details.amount, 25.5);
        assert_eq!(details.recipient_account, "1234");
    }

    #[test]
    fn test_parse_redirect_params() {
        let found = parse_redirect_params(
            "?payment_intent=pi_123&payment_intent_client_secret=pi_123_secret&redirect_status=succeeded",
        )
        .unwrap();
        assert_eq!(found.payment_intent, "pi_123");
        assert!(found.succeeded());
        assert_eq!(found.banner(), "Payment Successful!");

        let failed = parse_redirect_params("payment_intent=pi_9&redirect_status=failed").unwrap();
        assert_eq!(failed.banner(), "Payment Failed or Canceled.");
    }

    #[test]
    fn test_redirect_params_need_both_values() {
        assert_eq!(parse_redirect_params(""), None);
        assert_eq!(parse_redirect_params("?payment_intent=pi_1"), None);
        assert_eq!(parse_redirect_params("?redirect_status=succeeded"), None);
        assert_eq!(parse_redirect_params("?page=2"), None);
    }
}
