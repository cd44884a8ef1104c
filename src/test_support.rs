//! In-memory doubles and request helpers shared by the unit tests.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::to_bytes;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::Duration;
use mongodb::bson::{from_document, to_document, Bson, Document};
use serde_json::Value;

use crate::models::{Advertisement, CartItem, Category, Extra, Medicine, Payment, Role, User};
use crate::processor::{ChargeIntent, PaymentProcessor, ProcessorError};
use crate::routes;
use crate::state::{AppState, Stores};
use crate::store::{
    DeleteOutcome, DocumentStore, FieldFilter, InsertOutcome, Record, StoreError, StoreResult,
    UpdateOutcome,
};
use crate::token::{Identity, TokenKeys};

pub const SECRET: &str = "test-secret";

/// Keeps documents as BSON in insertion order, the same shape the database
/// would hand back.
pub struct MemoryStore<T> {
    docs: Mutex<Vec<Document>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> MemoryStore<T> {
    pub fn shared() -> Arc<Self> {
        Arc::new(MemoryStore {
            docs: Mutex::new(Vec::new()),
            _marker: PhantomData,
        })
    }

    pub fn with(records: Vec<T>) -> Arc<Self> {
        let docs = records
            .iter()
            .map(|r| to_document(r).unwrap())
            .collect();
        Arc::new(MemoryStore {
            docs: Mutex::new(docs),
            _marker: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }
}

fn has_id(doc: &Document, id: &str) -> bool {
    doc.get_str("_id").map(|v| v == id).unwrap_or(false)
}

#[async_trait]
impl<T: Record> DocumentStore<T> for MemoryStore<T> {
    async fn find(&self, filter: Option<FieldFilter>) -> StoreResult<Vec<T>> {
        let docs = self.docs.lock().unwrap();
        docs.iter()
            .filter(|d| filter.as_ref().map(|f| f.matches(d)).unwrap_or(true))
            .map(|d| from_document(d.clone()).map_err(StoreError::from))
            .collect()
    }

    async fn find_one(&self, filter: FieldFilter) -> StoreResult<Option<T>> {
        let docs = self.docs.lock().unwrap();
        docs.iter()
            .find(|d| filter.matches(d))
            .map(|d| from_document(d.clone()).map_err(StoreError::from))
            .transpose()
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<T>> {
        self.find_one(FieldFilter::eq("_id", id)).await
    }

    async fn insert(&self, record: &T) -> StoreResult<InsertOutcome> {
        let doc = to_document(record)?;
        let mut docs = self.docs.lock().unwrap();
        if docs.iter().any(|d| has_id(d, record.id())) {
            return Err(StoreError::Duplicate(record.id().to_owned()));
        }
        docs.push(doc);
        Ok(InsertOutcome::new(record.id()))
    }

    async fn update_by_id(
        &self,
        id: &str,
        set: Document,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome> {
        let mut docs = self.docs.lock().unwrap();
        if let Some(doc) = docs.iter_mut().find(|d| has_id(d, id)) {
            let before = doc.clone();
            for (key, value) in set {
                doc.insert(key, value);
            }
            return Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(*doc != before),
                upserted_id: None,
            });
        }
        if !upsert {
            return Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_id: None,
            });
        }
        let mut doc = set;
        doc.insert("_id", Bson::String(id.to_owned()));
        docs.push(doc);
        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id.to_owned()),
        })
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<DeleteOutcome> {
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|d| !has_id(d, id));
        Ok(DeleteOutcome::new((before - docs.len()) as u64))
    }

    async fn delete_many_by_ids(&self, ids: &[String]) -> StoreResult<DeleteOutcome> {
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|d| !ids.iter().any(|id| has_id(d, id)));
        Ok(DeleteOutcome::new((before - docs.len()) as u64))
    }
}

/// Answers every intent with `secret_<amount>` unless built failing.
pub struct StubProcessor {
    fail: bool,
    calls: Mutex<Vec<(i64, String)>>,
}

impl StubProcessor {
    pub fn shared() -> Arc<Self> {
        Arc::new(StubProcessor {
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(StubProcessor {
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(i64, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProcessor for StubProcessor {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<ChargeIntent, ProcessorError> {
        self.calls.lock().unwrap().push((amount, currency.to_owned()));
        if self.fail {
            return Err(ProcessorError::Rejected {
                status: 402,
                message: "card declined".into(),
            });
        }
        Ok(ChargeIntent {
            id: format!("pi_{amount}"),
            client_secret: format!("secret_{amount}"),
        })
    }
}

pub fn user(id: &str, email: &str, role: Option<Role>) -> User {
    User {
        id: id.into(),
        email: email.into(),
        role,
        extra: Extra::new(),
    }
}

pub fn cart_item(id: &str, email: &str, quantity: i64) -> CartItem {
    CartItem {
        id: id.into(),
        email: email.into(),
        medicine_id: "m1".into(),
        quantity,
        price: 10.0,
        extra: Extra::new(),
    }
}

pub fn keys() -> TokenKeys {
    TokenKeys::new(SECRET, Duration::hours(1))
}

pub fn bearer(email: &str) -> (&'static str, String) {
    let token = keys().issue(Identity::new(email)).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

/// Application state over empty in-memory stores, plus handles to the stores
/// for seeding and inspection.
pub struct Fixture {
    pub state: AppState,
    pub users: Arc<MemoryStore<User>>,
    pub carts: Arc<MemoryStore<CartItem>>,
    pub payments: Arc<MemoryStore<Payment>>,
    pub processor: Arc<StubProcessor>,
}

impl Fixture {
    pub fn new(users: Vec<User>, carts: Vec<CartItem>) -> Self {
        let users = MemoryStore::with(users);
        let carts = MemoryStore::with(carts);
        let payments = MemoryStore::<Payment>::shared();
        let processor = StubProcessor::shared();
        let stores = Stores {
            users: users.clone(),
            medicines: MemoryStore::<Medicine>::shared(),
            categories: MemoryStore::<Category>::shared(),
            carts: carts.clone(),
            payments: payments.clone(),
            advertisements: MemoryStore::<Advertisement>::shared(),
        };
        let state = AppState::new(stores, processor.clone(), keys(), "usd");
        Fixture {
            state,
            users,
            carts,
            payments,
            processor,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let keys = self.state.tokens.clone();
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .configure(move |cfg| routes::configure(cfg, &keys))
    }
}

/// Sends `req` and returns the status and JSON body, whether the response
/// came from a handler or from an error raised in middleware.
pub async fn send<S>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = match test::try_call_service(app, req).await {
        Ok(res) => {
            let status = res.status();
            (status, test::read_body(res).await)
        }
        Err(err) => {
            let res = err.error_response();
            let status = res.status();
            (status, to_bytes(res.into_body()).await.unwrap())
        }
    };
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, value)
}
