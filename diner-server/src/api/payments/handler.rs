//! Payment API Handlers

use axum::{Json, extract::State};
use shared::models::{PaymentIntentRequest, PaymentIntentResponse, PaymentReceipt, PaymentRequest};

use crate::auth::AuthContext;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

/// POST /create-payment-intent
pub async fn create_intent(
    State(state): State<ServerState>,
    auth: AuthContext,
    Json(req): Json<PaymentIntentRequest>,
) -> AppResult<Json<PaymentIntentResponse>> {
    let gateway = state
        .gateway
        .as_ref()
        .ok_or_else(|| AppError::new(ErrorCode::PaymentGatewayNotConfigured))?;

    let client_secret = gateway.create_intent(req.price).await?;
    tracing::info!(email = %auth.email, price = %req.price, "Payment intent created");
    Ok(Json(PaymentIntentResponse { client_secret }))
}

/// POST /payments
pub async fn record(
    State(state): State<ServerState>,
    auth: AuthContext,
    Json(req): Json<PaymentRequest>,
) -> AppResult<Json<PaymentReceipt>> {
    let receipt = state.reconciler.record_payment(&auth.email, req).await?;
    Ok(Json(receipt))
}
