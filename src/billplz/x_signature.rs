use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::err_responses::{BillError, ErrorResponse, MapErrorResponse};

type HmacSha256 = Hmac<Sha256>;

/// Key/value pairs Billplz signs with the merchant's X-Signature key, in the order received.
pub struct SignedParams(Vec<(String, String)>);

impl From<Vec<(String, String)>> for SignedParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl SignedParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Checks the HMAC-SHA256 in `signature_field` against every other parameter.
    pub fn verify(&self, key: &str, signature_field: &str) -> Result<(), BillError> {
        let signature = self
            .get(signature_field)
            .ok_or(BillError::Unauthorized)?;
        let expected = hex::decode(signature.trim()).map_err(|_| BillError::Unauthorized)?;

        let mut mac =
            HmacSha256::new_from_slice(key.as_bytes()).map_err_response(ErrorResponse::ServerError)?;
        mac.update(
            source_string(
                self.0
                    .iter()
                    .filter(|(k, _)| k != signature_field)
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            )
            .as_bytes(),
        );

        mac.verify_slice(&expected)
            .map_err(|_| BillError::Unauthorized)
    }
}

/// Each pair becomes key and value glued together, with brackets dropped from the key
/// (`billplz[paid]=true` gives `billplzpaidtrue`). Pieces are sorted case-insensitively and
/// joined with `|`.
pub fn source_string<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut pieces: Vec<String> = params
        .into_iter()
        .map(|(key, value)| format!("{}{value}", key.replace(['[', ']'], "")))
        .collect();
    pieces.sort_by_cached_key(|piece| piece.to_lowercase());
    pieces.join("|")
}

pub fn sign(key: &str, source: &str) -> Result<String, BillError> {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).map_err_response(ErrorResponse::ServerError)?;
    mac.update(source.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
