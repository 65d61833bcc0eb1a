use axum::{
    extract::{rejection::FormRejection, State},
    Form,
};
use tracing::info;

use crate::err_responses::{BillError, ErrorResponse, MapErrorResponse};

use super::x_signature::SignedParams;

/// Server-to-server notification Billplz sends whenever a bill changes state.
pub async fn bill_callback(
    State(state): State<crate::AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<&'static str, BillError> {
    let Form(pairs) = form.map_err_response(ErrorResponse::InvalidRequest)?;
    let key = state
        .config
        .x_signature_key
        .as_deref()
        .ok_or(BillError::Configuration)?;

    let params = SignedParams::from(pairs);
    params.verify(key, "x_signature")?;

    let bill_id = params
        .get("id")
        .ok_or_else(|| BillError::InvalidRequest("id is required".to_string()))?;

    info!(
        bill_id,
        paid = params.get("paid") == Some("true"),
        state = params.get("state"),
        paid_amount = params.get("paid_amount"),
        paid_at = params.get("paid_at"),
        "Billplz callback received"
    );

    Ok("OK")
}
