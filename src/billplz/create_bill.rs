use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    config::BillplzConfig,
    err_responses::{BillError, ErrorResponse, MapErrorResponse},
};

use super::{bill_payload::BillCreationPayload, request_payload};

#[derive(Serialize)]
pub struct CreateBillResponse {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    bill_id: Option<String>,
}

#[derive(Deserialize)]
struct BillResponse {
    url: Option<String>,
    id: Option<String>,
}

pub async fn create_bill(
    State(state): State<crate::AppState>,
    body: Bytes,
) -> Result<Json<CreateBillResponse>, BillError> {
    let order = request_payload::parse_order(&body)?.validate(state.config.flow)?;
    let credentials = state.config.credentials()?;
    let payload = BillCreationPayload::build(&order, credentials.collection_id, &state.config);

    let bill = submit_bill(
        &state.http_client,
        &state.config,
        credentials.api_key,
        &payload,
    )
    .await?;

    info!(
        bill_id = bill.id.as_deref(),
        amount = payload.amount,
        sandbox = state.config.sandbox,
        "Billplz bill created"
    );

    Ok(Json(CreateBillResponse {
        url: bill.url,
        bill_id: bill.id,
    }))
}

pub struct CreatedBill {
    pub url: String,
    pub id: Option<String>,
}

/// One `POST /bills`; the call is not idempotent, so it is never retried here.
pub async fn submit_bill(
    client: &reqwest::Client,
    config: &BillplzConfig,
    api_key: &str,
    payload: &BillCreationPayload,
) -> Result<CreatedBill, BillError> {
    let response = client
        .post(config.bills_url())
        .basic_auth(api_key, None::<&str>)
        .form(payload)
        .send()
        .await
        .map_err_response(ErrorResponse::ServerError)?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err_response(ErrorResponse::ServerError)?;
    let text = text.replace(api_key, "[redacted]");

    if !status.is_success() {
        error!(status = status.as_u16(), body = %text, "Billplz API error");
        return Err(BillError::Provider {
            status: status.as_u16(),
            body: text,
        });
    }

    match serde_json::from_str::<BillResponse>(&text) {
        Ok(BillResponse {
            url: Some(url),
            id,
        }) if !url.trim().is_empty() => Ok(CreatedBill { url, id }),
        _ => {
            error!(status = status.as_u16(), body = %text, "Billplz response has no bill url");
            Err(BillError::Provider {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}
