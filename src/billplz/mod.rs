mod amount;
mod bill_payload;
mod callback;
mod create_bill;
mod redirect;
mod request_payload;
mod x_signature;


use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::err_responses::BillError;

async fn method_not_allowed() -> BillError {
    BillError::MethodNotAllowed
}

/// `OPTIONS` requests are answered by the CORS layer before they reach a handler.
pub fn router(state: crate::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route(
            "/createBill",
            post(create_bill::create_bill).fallback(method_not_allowed),
        )
        .route(
            "/billplzCallback",
            post(callback::bill_callback).fallback(method_not_allowed),
        )
        .route(
            "/billplzRedirect",
            get(redirect::payment_redirect).fallback(method_not_allowed),
        )
        .layer(cors)
        .with_state(state)
}
