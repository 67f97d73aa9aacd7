//! Payment Repository
//!
//! `settle` removes the owner's cart lines and writes the payment in a
//! single transaction. The payment records only the ids the delete hit.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use shared::models::Payment;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, error_mentions};
use crate::db::repository::{PaymentLedger, RepoError, RepoResult};

const SETTLE_QUERY: &str = r#"
BEGIN TRANSACTION;
LET $removed = (SELECT VALUE uid FROM cart WHERE uid INSIDE $cart_items AND email = $email);
DELETE cart WHERE uid INSIDE $removed RETURN NONE;
CREATE type::thing('payment', $uid) SET
    uid = $uid,
    email = $email,
    transactionId = $transaction_id,
    price = $price,
    quantity = IF $quantity > 0 THEN $quantity ELSE array::len($removed) END,
    cartItems = $removed,
    menuItems = $menu_items,
    status = $status,
    date = $date,
    createdAt = $created_at
RETURN quantity, cartItems;
COMMIT TRANSACTION;
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettledRow {
    quantity: u32,
    cart_items: Vec<String>,
}

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl PaymentLedger for PaymentRepository {
    async fn settle(&self, mut payment: Payment) -> RepoResult<Payment> {
        let price = payment
            .price
            .to_f64()
            .ok_or_else(|| RepoError::Validation(format!("Invalid price {}", payment.price)))?;

        let mut response = self
            .base
            .db()
            .query(SETTLE_QUERY)
            .bind(("uid", payment.id.clone()))
            .bind(("email", payment.user_email.clone()))
            .bind(("transaction_id", payment.transaction_id.clone()))
            .bind(("price", price))
            .bind(("quantity", payment.quantity))
            .bind(("cart_items", std::mem::take(&mut payment.cart_items)))
            .bind(("menu_items", payment.menu_items.clone()))
            .bind(("status", payment.status.clone()))
            .bind(("date", payment.date.clone()))
            .bind(("created_at", payment.created_at))
            .await?;

        let errors = response.take_errors();
        if errors.values().any(|e| error_mentions(e, "already exists")) {
            return Err(RepoError::Duplicate(format!("payment {}", payment.id)));
        }
        if let Some(err) = errors.into_values().next() {
            return Err(err.into());
        }
        let last = response.num_statements().saturating_sub(1);
        let rows: Vec<SettledRow> = response.take(last)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database(format!("payment {} not created", payment.id)))?;

        payment.quantity = row.quantity;
        payment.cart_items = row.cart_items;
        Ok(payment)
    }

    async fn find_all(&self) -> RepoResult<Vec<Payment>> {
        let payments: Vec<Payment> = self
            .base
            .db()
            .query("SELECT * OMIT id FROM payment ORDER BY createdAt")
            .await?
            .take(0)?;
        Ok(payments)
    }
}
