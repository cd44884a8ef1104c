use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::store::{DeleteOutcome, InsertOutcome, Record};

/// Fields the API stores without interpreting.
pub type Extra = Map<String, Value>;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Drops keys that the server owns so a client cannot smuggle them in
/// through the flattened extras.
pub fn strip(mut extra: Extra, reserved: &[&str]) -> Extra {
    for key in reserved {
        extra.remove(*key);
    }
    extra
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Seller,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Seller => "seller",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl User {
    /// A user without a stored role is a plain user.
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or(Role::User)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpInput {
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateSignUp {
    pub message: &'static str,
    pub inserted_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SignUpOutcome {
    Created(InsertOutcome),
    AlreadyExists(DuplicateSignUp),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub price: f64,
    pub seller_email: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Deserialize)]
pub struct MedicineInput {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub seller_email: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Deserialize)]
pub struct MedicineQuery {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub metadata: Extra,
}

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(flatten)]
    pub metadata: Extra,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub medicine_id: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartInput {
    #[serde(default)]
    pub email: Option<String>,
    pub medicine_id: String,
    #[serde(default)]
    pub quantity: Option<i64>,
    pub price: f64,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
    Increment,
    Decrement,
}

#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    pub action: CartAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(rename = "cartIds", alias = "cartId")]
    pub cart_ids: Vec<String>,
    pub amount: f64,
    #[serde(default)]
    pub status: PaymentStatus,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Deserialize)]
pub struct PaymentInput {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "cartIds", alias = "cartId", default)]
    pub cart_ids: Vec<String>,
    #[serde(alias = "price")]
    pub amount: f64,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub payment_result: InsertOutcome,
    pub delete_result: DeleteOutcome,
}

#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    pub price: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub client_secret: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdvertisementStatus {
    #[default]
    Pending,
    Accepted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advertisement {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: AdvertisementStatus,
    #[serde(flatten)]
    pub content: Extra,
}

#[derive(Debug, Deserialize)]
pub struct AdvertisementQuery {
    pub status: Option<AdvertisementStatus>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
}

macro_rules! record {
    ($($ty:ty),+) => {
        $(impl Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })+
    };
}

record!(User, Medicine, Category, CartItem, Payment, Advertisement);
