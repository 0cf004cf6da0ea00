//! Wire types for the BankEdge REST API.
//!
//! Transaction rows use one canonical schema: `stripe_status` and
//! `processing_decision`. The ML endpoint emits `decision` and `deviceId`
//! for the same rows, so those are accepted as aliases.

use serde::{Deserialize, Deserializer, Serialize};

// -- Enumerations --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
    Superadmin,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
            Role::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Role {
        match value {
            "admin" => Role::Admin,
            "superadmin" => Role::Superadmin,
            _ => Role::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeviceStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, DeviceStatus::Online)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "ONLINE",
            DeviceStatus::Offline => "OFFLINE",
            DeviceStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Payment state as reported by Stripe and stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StripeStatus {
    Succeeded,
    Failed,
    Processing,
    Pending,
    #[default]
    #[serde(other)]
    Unknown,
}

impl StripeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StripeStatus::Succeeded => "Succeeded",
            StripeStatus::Failed => "Failed",
            StripeStatus::Processing => "Processing",
            StripeStatus::Pending => "Pending",
            StripeStatus::Unknown => "Unknown",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            StripeStatus::Succeeded => "status-active",
            StripeStatus::Failed => "status-error",
            StripeStatus::Processing => "status-warning",
            StripeStatus::Pending | StripeStatus::Unknown => "status-inactive",
        }
    }
}

/// Server-side routing decision for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Edge,
    Cloud,
    Flagged,
    #[serde(other)]
    Unknown,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Edge => "edge",
            Decision::Cloud => "cloud",
            Decision::Flagged => "flagged",
            Decision::Unknown => "unknown",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Decision::Edge => "badge edge",
            Decision::Flagged => "badge status-error",
            Decision::Cloud | Decision::Unknown => "badge cloud",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Decision::Edge => "fa-server",
            Decision::Cloud => "fa-cloud",
            Decision::Flagged | Decision::Unknown => "fa-exclamation-triangle",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Decision::Edge => "#10b981",
            Decision::Flagged => "#ef4444",
            Decision::Cloud | Decision::Unknown => "#3b82f6",
        }
    }
}

// -- Devices --

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default)]
    pub load: f64,
    #[serde(default)]
    pub latency: f64,
    #[serde(default)]
    pub transactions_per_sec: Option<f64>,
    #[serde(default)]
    pub last_sync: Option<String>,
    #[serde(default)]
    pub sync_status: String,
}

/// Header box on the dashboard describing the admin's own edge node.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceBox {
    pub id: String,
    pub location: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub sync_status: String,
}

/// Reply from the sync and power endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceActionResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status: Option<DeviceStatus>,
    #[serde(default)]
    pub last_sync: Option<String>,
}

// -- Transactions --

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub stripe_status: StripeStatus,
    #[serde(default, alias = "decision")]
    pub processing_decision: Option<Decision>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub latency: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, rename = "merchant_name")]
    pub merchant: Option<String>,
    #[serde(default, rename = "recipient_account")]
    pub recipient: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, alias = "deviceId")]
    pub device_id: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl Transaction {
    pub fn decision(&self) -> Decision {
        self.processing_decision.unwrap_or(Decision::Unknown)
    }
}

/// One page of `/api/transactions`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TransactionPage {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default = "first_page")]
    pub current_page: u32,
}

fn first_page() -> u32 {
    1
}

/// Older backends answer `/api/transactions` with a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransactionsResponse {
    Paged(TransactionPage),
    List(Vec<Transaction>),
}

impl TransactionsResponse {
    pub fn into_page(self) -> TransactionPage {
        match self {
            TransactionsResponse::Paged(page) => page,
            TransactionsResponse::List(transactions) => TransactionPage {
                total: transactions.len() as u64,
                transactions,
                pages: 1,
                current_page: 1,
            },
        }
    }
}

// -- Dashboard --

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LatencySample {
    pub timestamp: String,
    #[serde(default)]
    pub edge: f64,
    #[serde(default)]
    pub hybrid: f64,
    #[serde(default)]
    pub cloud: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(default)]
    pub device_box: Option<DeviceBox>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub latency: Vec<LatencySample>,
    #[serde(default)]
    pub user_balance: Option<f64>,
}

// -- ML insights --

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MlMetric {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub avg_confidence: f64,
    #[serde(default)]
    pub fraud_detected: u64,
    #[serde(default)]
    pub processing_time: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionLog {
    #[serde(default)]
    pub decision: Option<Decision>,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LiveVerification {
    pub id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub latency: f64,
    #[serde(default)]
    pub decision: Option<Decision>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlData {
    #[serde(default)]
    pub metrics: Vec<MlMetric>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub decisions: Vec<DecisionLog>,
    #[serde(default)]
    pub latest_verification: Option<LiveVerification>,
}

// -- System management --

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlModel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub accuracy: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub deployed_nodes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuditLog {
    pub id: i64,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemData {
    #[serde(default)]
    pub admins: Vec<AdminUser>,
    #[serde(default)]
    pub edge_nodes: Vec<Device>,
    #[serde(default)]
    pub ml_models: Vec<MlModel>,
    #[serde(default)]
    pub audit_logs: Vec<AuditLog>,
}

/// Accepts `"98.5%"` as well as `98.5` for display-only fields.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

// -- Auth and user management --

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default, rename = "access_token")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub user_location: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub location: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserUpdate {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserActionResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

// -- Payments --

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeConfig {
    #[serde(default)]
    pub publishable_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentHandle {
    pub client_secret: String,
    pub payment_intent_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub amount: f64,
    pub recipient_account: String,
    pub reference: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentResultRequest {
    pub payment_intent: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentRecord {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub stripe_status: Option<StripeStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_decodes_canonical_fields() {
        let json = r#"{
            "id": "pi_123",
            "amount": 150.5,
            "type": "transfer",
            "stripe_status": "succeeded",
            "processing_decision": "edge",
            "merchant_name": "Kedai Runcit",
            "recipient_account": "1234-5678",
            "device_id": "edge-14",
            "device_name": "Edge Node KL",
            "latency": 12.4,
            "confidence": 0.91,
            "timestamp": "2024-05-01T10:00:00+08:00"
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.stripe_status, StripeStatus::Succeeded);
        assert_eq!(txn.decision(), Decision::Edge);
        assert_eq!(txn.merchant.as_deref(), Some("Kedai Runcit"));
        assert_eq!(txn.recipient.as_deref(), Some("1234-5678"));
        assert_eq!(txn.kind.as_deref(), Some("transfer"));
    }

    #[test]
    fn test_ml_prediction_row_maps_decision_alias() {
        let json = r#"{"id": "t1", "amount": 20.0, "type": "payment", "decision": "flagged", "confidence": 0.4, "deviceId": "edge-2"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.processing_decision, Some(Decision::Flagged));
        assert_eq!(txn.device_id.as_deref(), Some("edge-2"));
        assert_eq!(txn.stripe_status, StripeStatus::Unknown);
    }

    #[test]
    fn test_unknown_enum_values_do_not_fail_payload() {
        let json = r#"{"id": "t2", "stripe_status": "requires_action", "processing_decision": "hybrid"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.stripe_status, StripeStatus::Unknown);
        assert_eq!(txn.decision(), Decision::Unknown);
    }

    #[test]
    fn test_null_decision_is_none() {
        let json = r#"{"id": "t3", "amount": 1.0, "processing_decision": null}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.processing_decision, None);
    }

    #[test]
    fn test_transactions_response_accepts_bare_list() {
        let json = r#"[{"id": "a"}, {"id": "b"}]"#;
        let page = serde_json::from_str::<TransactionsResponse>(json)
            .unwrap()
            .into_page();
        assert_eq!(page.transactions.len(), 2);
        assert_eq!(page.pages, 1);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_transactions_response_paged() {
        let json = r#"{"transactions": [{"id": "a"}], "total": 11, "pages": 3, "current_page": 2}"#;
        let page = serde_json::from_str::<TransactionsResponse>(json)
            .unwrap()
            .into_page();
        assert_eq!(page.total, 11);
        assert_eq!(page.pages, 3);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn test_device_camel_case_fields() {
        let json = r#"{
            "id": "edge-1", "name": "Edge Node Johor", "location": "Johor, Malaysia",
            "region": "State", "status": "online", "load": 42.0, "latency": 9.5,
            "transactionsPerSec": 33.3, "lastSync": "2024-05-01T10:00:00", "syncStatus": "synced"
        }"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert!(device.status.is_online());
        assert_eq!(device.transactions_per_sec, Some(33.3));
        assert_eq!(device.sync_status, "synced");
    }

    #[test]
    fn test_ml_model_accuracy_string_or_number() {
        let a: MlModel =
            serde_json::from_str(r#"{"id": "m1", "accuracy": "98.5%"}"#).unwrap();
        let b: MlModel = serde_json::from_str(r#"{"id": "m2", "accuracy": 96.2}"#).unwrap();
        assert_eq!(a.accuracy, "98.5%");
        assert_eq!(b.accuracy, "96.2");
    }

    #[test]
    fn test_login_response_fields() {
        let json = r#"{"access_token": "jwt", "role": "superadmin", "userLocation": ""}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token.as_deref(), Some("jwt"));
        assert_eq!(resp.role, Some(Role::Superadmin));
        assert_eq!(resp.user_location.as_deref(), Some(""));
    }

    #[test]
    fn test_user_update_omits_empty_password() {
        let update = UserUpdate {
            role: Role::Admin,
            password: None,
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"role":"admin"}"#);
    }
}
