use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{
    config::RedirectFlow,
    err_responses::{BillError, ErrorResponse, MapErrorResponse},
};

use super::amount;

/// Order as sent by the storefront, before any validation.
#[derive(Deserialize, Default, Debug)]
pub struct OrderRequest {
    pub buyer_name: Option<String>,
    pub buyer_email: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub buyer_phone: Option<String>,
    pub total_amount: Option<Value>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub order_number: Option<String>,
    #[serde(rename = "orderId", default, deserialize_with = "text_or_number")]
    pub order_id: Option<String>,
}

/// Accepts both `{ "orderData": { .. } }` and the flat shape.
#[derive(Deserialize)]
struct RequestBody {
    #[serde(rename = "orderData")]
    order_data: Option<OrderRequest>,
    #[serde(flatten)]
    flat: OrderRequest,
}

/// Where the bill sends the buyer once payment finishes.
#[derive(Debug, PartialEq)]
pub enum ReturnPath {
    Callback,
    Confirmation { order_id: String },
}

#[derive(Debug, PartialEq)]
pub struct ValidOrder {
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: Option<String>,
    pub amount_minor: i64,
    pub order_number: Option<String>,
    pub order_id: Option<String>,
    pub return_path: ReturnPath,
}

pub fn parse_order(body: &[u8]) -> Result<OrderRequest, BillError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(BillError::InvalidRequest(
            "orderData is required".to_string(),
        ));
    }

    let RequestBody { order_data, flat } =
        serde_json::from_slice::<RequestBody>(body).map_err_response(ErrorResponse::InvalidRequest)?;

    Ok(order_data.unwrap_or(flat))
}

impl OrderRequest {
    pub fn validate(self, flow: RedirectFlow) -> Result<ValidOrder, BillError> {
        let buyer_name = present(self.buyer_name);
        let buyer_email = present(self.buyer_email);
        let order_id = present(self.order_id);
        let total_amount = self.total_amount.filter(|raw| match raw {
            Value::Null => false,
            Value::String(text) => !text.trim().is_empty(),
            _ => true,
        });

        let mut missing = Vec::new();
        if buyer_name.is_none() {
            missing.push("buyer_name");
        }
        if buyer_email.is_none() {
            missing.push("buyer_email");
        }
        if total_amount.is_none() {
            missing.push("total_amount");
        }
        let return_path = match flow {
            RedirectFlow::Callback => Some(ReturnPath::Callback),
            RedirectFlow::DirectConfirmation => order_id
                .clone()
                .map(|order_id| ReturnPath::Confirmation { order_id }),
        };
        if return_path.is_none() {
            missing.push("orderId");
        }

        match (buyer_name, buyer_email, total_amount, return_path) {
            (Some(buyer_name), Some(buyer_email), Some(total_amount), Some(return_path)) => {
                Ok(ValidOrder {
                    buyer_name,
                    buyer_email,
                    buyer_phone: present(self.buyer_phone),
                    amount_minor: amount::parse_amount(&total_amount)
                        .and_then(amount::to_minor_units)?,
                    order_number: present(self.order_number),
                    order_id,
                    return_path,
                })
            }
            _ => Err(BillError::InvalidRequest(describe_missing(&missing))),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn describe_missing(fields: &[&str]) -> String {
    match fields {
        [] => "missing required fields".to_string(),
        [only] => format!("{only} is required"),
        [init @ .., last] => format!("{} and {last} are required", init.join(", ")),
    }
}

/// Identifiers and phone numbers arrive as strings from some clients and numbers from others.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(body: &str) -> OrderRequest {
        parse_order(body.as_bytes()).unwrap()
    }

    fn rejection(result: Result<ValidOrder, BillError>) -> String {
        match result {
            Err(BillError::InvalidRequest(message)) => message,
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn flat_and_wrapped_shapes_are_equivalent() {
        let flat = order(
            r#"{"buyer_name":"Aina","buyer_email":"aina@example.com","total_amount":"12.50","orderId":77}"#,
        )
        .validate(RedirectFlow::Callback)
        .unwrap();
        let wrapped = order(
            r#"{"orderData":{"buyer_name":"Aina","buyer_email":"aina@example.com","total_amount":12.5,"orderId":"77"}}"#,
        )
        .validate(RedirectFlow::Callback)
        .unwrap();

        assert_eq!(flat, wrapped);
        assert_eq!(flat.amount_minor, 1250);
        assert_eq!(flat.order_id.as_deref(), Some("77"));
    }

    #[test]
    fn empty_body_is_rejected() {
        for body in ["", "  \n"] {
            match parse_order(body.as_bytes()) {
                Err(BillError::InvalidRequest(message)) => {
                    assert_eq!(message, "orderData is required")
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        for body in ["not json", "[1,2]", "42", r#"{"buyer_name": ["x"]}"#] {
            assert!(
                matches!(parse_order(body.as_bytes()), Err(BillError::InvalidRequest(_))),
                "{body} should be rejected"
            );
        }
    }

    #[test]
    fn names_every_missing_field() {
        let message = rejection(order("{}").validate(RedirectFlow::Callback));
        assert_eq!(
            message,
            "buyer_name, buyer_email and total_amount are required"
        );

        let message = rejection(
            order(r#"{"buyer_name":"Aina","buyer_email":"  ","total_amount":5}"#)
                .validate(RedirectFlow::Callback),
        );
        assert_eq!(message, "buyer_email is required");
    }

    #[test]
    fn direct_flow_requires_order_id() {
        let body = r#"{"buyer_name":"Aina","buyer_email":"aina@example.com","total_amount":5}"#;
        assert!(order(body).validate(RedirectFlow::Callback).is_ok());

        let message = rejection(order(body).validate(RedirectFlow::DirectConfirmation));
        assert_eq!(message, "orderId is required");

        let with_id = order(&body.replace('}', r#","orderId":"ord_42"}"#))
            .validate(RedirectFlow::DirectConfirmation)
            .unwrap();
        assert_eq!(
            with_id.return_path,
            ReturnPath::Confirmation {
                order_id: "ord_42".to_string()
            }
        );
    }

    #[test]
    fn empty_amount_counts_as_missing() {
        let message = rejection(
            order(r#"{"buyer_name":"Aina","buyer_email":"a@b.c","total_amount":""}"#)
                .validate(RedirectFlow::Callback),
        );
        assert_eq!(message, "total_amount is required");
    }

    #[test]
    fn optional_fields_are_trimmed_and_dropped_when_blank() {
        let valid = order(
            r#"{"buyer_name":" Aina ","buyer_email":"a@b.c","buyer_phone":"","total_amount":1,"order_number":" KL-1 "}"#,
        )
        .validate(RedirectFlow::Callback)
        .unwrap();
        assert_eq!(valid.buyer_name, "Aina");
        assert_eq!(valid.buyer_phone, None);
        assert_eq!(valid.order_number.as_deref(), Some("KL-1"));
    }
}
