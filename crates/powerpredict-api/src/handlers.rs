//! Route handler functions for all API endpoints.
//!
//! Each handler extracts a JSON body via axum extractors, runs the billing
//! or chat logic, and returns a JSON response.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use powerpredict_billing::compute_bill;
use powerpredict_chat::{respond, validate_query, AdvisoryResponse, StdRandom};
use powerpredict_core::types::{Appliance, BillCalculation, BillSettings};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub assistant_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct BillRequest {
    pub appliances: Vec<Appliance>,
    /// Falls back to the configured default settings.
    #[serde(default)]
    pub settings: Option<BillSettings>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BillResponse {
    /// `null` when no appliances were given.
    pub calculation: Option<BillCalculation>,
}

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    pub message: String,
    #[serde(default)]
    pub appliances: Vec<Appliance>,
    #[serde(default)]
    pub settings: Option<BillSettings>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health - liveness plus assistant availability.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        assistant_enabled: state.assistant.is_some(),
    })
}

/// POST /api/bill - aggregate an appliance list into a bill.
pub async fn bill(
    State(state): State<AppState>,
    Json(request): Json<BillRequest>,
) -> Result<Json<BillResponse>, ApiError> {
    let settings = request
        .settings
        .unwrap_or_else(|| state.config.billing.default_settings.clone());
    let calculation = compute_bill(&request.appliances, &settings)?;
    debug!(
        appliances = request.appliances.len(),
        monthly_bill = calculation.as_ref().map(|c| c.monthly_bill),
        "Bill computed"
    );
    Ok(Json(BillResponse { calculation }))
}

/// POST /api/advice - rule-based answer personalized with the bill.
pub async fn advice(
    State(state): State<AppState>,
    Json(request): Json<AdviceRequest>,
) -> Result<Json<AdvisoryResponse>, ApiError> {
    let query = validate_query(&request.message, state.config.chat.max_message_length)?;
    let settings = request
        .settings
        .unwrap_or_else(|| state.config.billing.default_settings.clone());
    let calculation = compute_bill(&request.appliances, &settings)?;

    let mut rng = StdRandom::new();
    let response = respond(query, calculation.as_ref(), &request.appliances, &mut rng);
    debug!(source = ?response.source, "Advice served");
    Ok(Json(response))
}

/// POST /api/chat - forward a message to the LLM fallback.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let message = validate_query(&request.message, state.config.chat.max_message_length)?;
    let assistant = state
        .assistant
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("assistant is not configured".to_string()))?;

    let reply = assistant.complete(message).await?;
    info!(chars = reply.len(), "Assistant reply forwarded");
    Ok(Json(ChatReply { reply }))
}
