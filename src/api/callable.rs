//! `sendVerificationEmail` and `testSendEmail` handlers

use crate::api::{CallableRequest, CallableResponse};
use crate::domain::{SendResult, SendVerificationRequest, TestEmailRequest, TestResult};
use crate::error::Result;
use crate::server::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};

/// POST /sendVerificationEmail
pub async fn send_verification_email(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CallableRequest<SendVerificationRequest>>, JsonRejection>,
) -> Result<Json<CallableResponse<SendResult>>> {
    let Json(request) = payload?;
    let result = state
        .dispatch_service
        .send_verification_code(&request.into_data())
        .await?;

    Ok(Json(CallableResponse::new(result)))
}

/// POST /testSendEmail
pub async fn test_send_email(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CallableRequest<TestEmailRequest>>, JsonRejection>,
) -> Result<Json<CallableResponse<TestResult>>> {
    let Json(request) = payload?;
    let result = state
        .dispatch_service
        .test_configuration(&request.into_data())
        .await?;

    Ok(Json(CallableResponse::new(result)))
}
