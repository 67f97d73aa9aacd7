//! Payment reconciler
//!
//! Records a payment and removes the cart lines it settles as one store
//! transaction, then queues the payer's notification. The payment ledger
//! is the durability anchor: a cart line that survives alongside a payment
//! referencing it is a straggler, found by [`PaymentReconciler::find_unsettled`]
//! and removed by [`PaymentReconciler::sweep`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{
    CartLine, DeleteResult, InsertResult, Payment, PaymentReceipt, PaymentRequest,
};
use shared::util::{new_id, now_millis};

use crate::db::repository::{CartStore, PaymentLedger};
use crate::notifications::{NotificationQueue, PaymentNotification};
use crate::utils::time::display_timestamp;
use crate::utils::{AppError, AppResult, ErrorCode};

pub struct PaymentReconciler {
    carts: Arc<dyn CartStore>,
    ledger: Arc<dyn PaymentLedger>,
    notifications: NotificationQueue,
    tz: Tz,
}

impl PaymentReconciler {
    pub fn new(
        carts: Arc<dyn CartStore>,
        ledger: Arc<dyn PaymentLedger>,
        notifications: NotificationQueue,
        tz: Tz,
    ) -> Self {
        Self {
            carts,
            ledger,
            notifications,
            tz,
        }
    }

    /// Record `request` for `caller` and settle the listed cart lines
    pub async fn record_payment(
        &self,
        caller: &str,
        request: PaymentRequest,
    ) -> AppResult<PaymentReceipt> {
        if caller != request.user_email {
            return Err(AppError::identity_mismatch().with_detail("email", request.user_email));
        }
        if request.price <= Decimal::ZERO {
            return Err(AppError::with_message(
                ErrorCode::InvalidAmount,
                "price must be positive",
            ));
        }
        if request.transaction_id.trim().is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "transactionId is required",
            ));
        }

        let mut seen = HashSet::new();
        let cart_items: Vec<String> = request
            .cart_items
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let requested = cart_items.clone();
        let payment = Payment {
            id: new_id(),
            user_email: request.user_email,
            transaction_id: request.transaction_id,
            price: request.price,
            quantity: request.quantity.unwrap_or(0),
            cart_items,
            menu_items: request.menu_items,
            status: request.status,
            date: display_timestamp(self.tz),
            created_at: now_millis(),
        };
        let payment_id = payment.id.clone();
        let transaction_id = payment.transaction_id.clone();

        let payment = self.ledger.settle(payment).await.map_err(|e| {
            tracing::error!(
                payment_id = %payment_id,
                transaction_id = %transaction_id,
                error = %e,
                "Payment settlement failed, nothing written"
            );
            AppError::from(e)
        })?;

        if payment.cart_items.len() != requested.len() {
            let settled: HashSet<&String> = payment.cart_items.iter().collect();
            let skipped: Vec<&String> = requested.iter().filter(|id| !settled.contains(id)).collect();
            tracing::warn!(
                payment_id = %payment.id,
                email = %payment.user_email,
                requested = ?requested,
                skipped = ?skipped,
                "Cart lines not owned by the payer or already gone were not settled"
            );
        }

        tracing::info!(
            payment_id = %payment.id,
            email = %payment.user_email,
            price = %payment.price,
            lines = payment.cart_items.len(),
            "Payment recorded"
        );

        self.notifications.enqueue(PaymentNotification {
            payment_id: payment.id.clone(),
            email: payment.user_email,
            transaction_id: payment.transaction_id,
            price: payment.price,
            date: payment.date,
        });

        Ok(PaymentReceipt {
            insert_result: InsertResult {
                acknowledged: true,
                inserted_id: payment.id,
            },
            deleted_result: DeleteResult::removed(payment.cart_items),
        })
    }

    /// Cart lines still present although a payment of the same owner
    /// references them
    pub async fn find_unsettled(&self) -> AppResult<Vec<CartLine>> {
        let payments = self.ledger.find_all().await?;
        let mut settled: HashMap<&str, HashSet<&str>> = HashMap::new();
        for p in &payments {
            settled
                .entry(p.user_email.as_str())
                .or_default()
                .extend(p.cart_items.iter().map(String::as_str));
        }

        let lines = self.carts.find_all().await?;
        Ok(lines
            .into_iter()
            .filter(|line| {
                settled
                    .get(line.user_email.as_str())
                    .is_some_and(|ids| ids.contains(line.id.as_str()))
            })
            .collect())
    }

    /// Delete every straggler reported by [`Self::find_unsettled`]
    pub async fn sweep(&self) -> AppResult<DeleteResult> {
        let stragglers = self.find_unsettled().await?;
        let mut removed = Vec::with_capacity(stragglers.len());
        for line in stragglers {
            if self.carts.delete_owned(&line.id, &line.user_email).await? {
                removed.push(line.id);
            }
        }
        if !removed.is_empty() {
            tracing::warn!(removed = ?removed, "Swept settled cart lines");
        }
        Ok(DeleteResult::removed(removed))
    }
}
