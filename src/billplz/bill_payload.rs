use serde::Serialize;

use crate::config::BillplzConfig;

use super::request_payload::{ReturnPath, ValidOrder};

/// Form body for `POST /bills`.
#[derive(Serialize, Debug, PartialEq)]
pub struct BillCreationPayload {
    pub collection_id: String,
    pub email: String,
    pub name: String,
    pub amount: i64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    pub redirect_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_1_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_2_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_2: Option<String>,
}

impl BillCreationPayload {
    pub fn build(order: &ValidOrder, collection_id: &str, config: &BillplzConfig) -> Self {
        let description = match order.order_number.as_ref().or(order.order_id.as_ref()) {
            Some(reference) => format!("Order {reference}"),
            None => "Order".to_string(),
        };

        let (callback_url, redirect_url) = match &order.return_path {
            ReturnPath::Callback => (
                Some(config.callback_url().to_string()),
                config.redirect_url().to_string(),
            ),
            ReturnPath::Confirmation { order_id } => {
                (None, config.confirmation_url(order_id).to_string())
            }
        };

        Self {
            collection_id: collection_id.to_string(),
            email: order.buyer_email.clone(),
            name: order.buyer_name.clone(),
            amount: order.amount_minor,
            description,
            callback_url,
            redirect_url,
            mobile: order.buyer_phone.clone(),
            reference_1_label: order.order_number.as_ref().map(|_| "Order Number"),
            reference_1: order.order_number.clone(),
            reference_2_label: order.order_id.as_ref().map(|_| "Order ID"),
            reference_2: order.order_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BillplzConfig {
        BillplzConfig::from_lookup(|key| match key {
            "BACKEND_BASE_URL" => Some("https://api.kliklaju.example".to_string()),
            "FRONTEND_BASE_URL" => Some("https://kliklaju.example".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn order() -> ValidOrder {
        ValidOrder {
            buyer_name: "Aina".to_string(),
            buyer_email: "aina@example.com".to_string(),
            buyer_phone: Some("0123456789".to_string()),
            amount_minor: 4990,
            order_number: Some("KL-1001".to_string()),
            order_id: Some("ord_42".to_string()),
            return_path: ReturnPath::Callback,
        }
    }

    #[test]
    fn callback_flow_points_back_at_this_service() {
        let payload = BillCreationPayload::build(&order(), "col_1", &config());
        assert_eq!(
            payload,
            BillCreationPayload {
                collection_id: "col_1".to_string(),
                email: "aina@example.com".to_string(),
                name: "Aina".to_string(),
                amount: 4990,
                description: "Order KL-1001".to_string(),
                callback_url: Some("https://api.kliklaju.example/api/billplzCallback".to_string()),
                redirect_url: "https://api.kliklaju.example/api/billplzRedirect".to_string(),
                mobile: Some("0123456789".to_string()),
                reference_1_label: Some("Order Number"),
                reference_1: Some("KL-1001".to_string()),
                reference_2_label: Some("Order ID"),
                reference_2: Some("ord_42".to_string()),
            }
        );
    }

    #[test]
    fn direct_flow_redirects_to_confirmation_page_without_callback() {
        let mut order = order();
        order.return_path = ReturnPath::Confirmation {
            order_id: "ord_42".to_string(),
        };
        let payload = BillCreationPayload::build(&order, "col_1", &config());
        assert_eq!(payload.callback_url, None);
        assert_eq!(
            payload.redirect_url,
            "https://kliklaju.example/order-confirmation/ord_42"
        );
    }

    #[test]
    fn description_falls_back_to_order_id_then_plain_prefix() {
        let mut order = order();
        order.order_number = None;
        let payload = BillCreationPayload::build(&order, "col_1", &config());
        assert_eq!(payload.description, "Order ord_42");
        assert_eq!(payload.reference_1_label, None);
        assert_eq!(payload.reference_1, None);

        order.order_id = None;
        let payload = BillCreationPayload::build(&order, "col_1", &config());
        assert_eq!(payload.description, "Order");
        assert_eq!(payload.reference_2, None);
    }
}
