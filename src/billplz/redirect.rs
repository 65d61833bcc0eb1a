use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::html;
use tracing::{info, warn};

use crate::{
    components::{self, StatusCard},
    err_responses::{BillError, ErrorResponse, MapErrorResponse},
};

use super::x_signature::SignedParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    Paid,
    NotPaid,
    Unverified,
}

/// Where Billplz sends the buyer's browser after the payment page.
pub async fn payment_redirect(
    State(state): State<crate::AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, BillError> {
    let Query(pairs) = query.map_err_response(ErrorResponse::InvalidRequest)?;
    let params = SignedParams::from(pairs);

    let bill_id = params
        .get("billplz[id]")
        .ok_or_else(|| BillError::InvalidRequest("billplz[id] is required".to_string()))?;
    let paid = params.get("billplz[paid]") == Some("true");

    let outcome = match state.config.x_signature_key.as_deref() {
        Some(key) => match params.verify(key, "billplz[x_signature]") {
            Ok(()) if paid => PaymentOutcome::Paid,
            Ok(()) => PaymentOutcome::NotPaid,
            Err(BillError::Unauthorized) => {
                warn!(bill_id, "Billplz redirect failed X-Signature check");
                PaymentOutcome::Unverified
            }
            Err(err) => return Err(err),
        },
        None => PaymentOutcome::Unverified,
    };

    info!(bill_id, ?outcome, "Billplz redirect");

    if let Some(frontend) = &state.config.frontend_base_url {
        let mut target = frontend.clone();
        target.set_path(&format!(
            "{}/payment-result",
            frontend.path().trim_end_matches('/')
        ));
        target
            .query_pairs_mut()
            .clear()
            .append_pair("bill_id", bill_id)
            .append_pair("paid", &(outcome == PaymentOutcome::Paid).to_string())
            .append_pair(
                "verified",
                &(outcome != PaymentOutcome::Unverified).to_string(),
            );
        return Ok(Redirect::to(target.as_str()).into_response());
    }

    let card = match outcome {
        PaymentOutcome::Paid => StatusCard::Success("Payment successful"),
        PaymentOutcome::NotPaid => StatusCard::Error("Payment was not completed"),
        PaymentOutcome::Unverified => StatusCard::Warning("We could not verify this payment"),
    };

    Ok(components::layout(html! {
        (card)
        p { "Bill reference: " code { (bill_id) } }
    })
    .into_response())
}
