use std::sync::Arc;

use mongodb::Database;

use crate::db::{self, MongoStore};
use crate::models::{Advertisement, CartItem, Category, Medicine, Payment, User};
use crate::processor::PaymentProcessor;
use crate::services::{Carts, Checkout, Directory};
use crate::store::DocumentStore;
use crate::token::TokenKeys;

/// One handle per collection.
pub struct Stores {
    pub users: Arc<dyn DocumentStore<User>>,
    pub medicines: Arc<dyn DocumentStore<Medicine>>,
    pub categories: Arc<dyn DocumentStore<Category>>,
    pub carts: Arc<dyn DocumentStore<CartItem>>,
    pub payments: Arc<dyn DocumentStore<Payment>>,
    pub advertisements: Arc<dyn DocumentStore<Advertisement>>,
}

impl Stores {
    pub fn mongo(db: &Database) -> Self {
        Stores {
            users: Arc::new(MongoStore::<User>::new(db, db::USERS)),
            medicines: Arc::new(MongoStore::<Medicine>::new(db, db::MEDICINE)),
            categories: Arc::new(MongoStore::<Category>::new(db, db::CATEGORIES)),
            carts: Arc::new(MongoStore::<CartItem>::new(db, db::CARTS)),
            payments: Arc::new(MongoStore::<Payment>::new(db, db::PAYMENTS)),
            advertisements: Arc::new(MongoStore::<Advertisement>::new(db, db::ADVERTISEMENTS)),
        }
    }
}

/// Everything a handler can reach, shared across workers through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub directory: Directory,
    pub carts: Carts,
    pub checkout: Checkout,
    pub medicines: Arc<dyn DocumentStore<Medicine>>,
    pub categories: Arc<dyn DocumentStore<Category>>,
    pub advertisements: Arc<dyn DocumentStore<Advertisement>>,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(
        stores: Stores,
        processor: Arc<dyn PaymentProcessor>,
        tokens: TokenKeys,
        currency: &str,
    ) -> Self {
        AppState {
            directory: Directory::new(stores.users.clone()),
            carts: Carts::new(stores.carts.clone(), stores.users),
            checkout: Checkout::new(stores.payments, stores.carts, processor, currency),
            medicines: stores.medicines,
            categories: stores.categories,
            advertisements: stores.advertisements,
            tokens,
        }
    }
}
