use std::{fmt, str::FromStr, time::Duration};

use reqwest::Url;

use crate::err_responses::BillError;

pub const LIVE_API_BASE: &str = "https://www.billplz.com/api/v3";
pub const SANDBOX_API_BASE: &str = "https://www.billplz-sandbox.com/api/v3";

const DEFAULT_PUBLIC_BASE_URL: &str = "https://kliklaju-backend.vercel.app";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BILLPLZ_REDIRECT_FLOW must be `callback` or `direct`, got `{0}`")]
    InvalidFlow(String),
    #[error("BILLPLZ_TIMEOUT_SECS must be a positive whole number, got `{0}`")]
    InvalidTimeout(String),
    #[error("{key} is not a valid http(s) URL: `{value}`")]
    InvalidUrl { key: &'static str, value: String },
}

/// Where Billplz sends the buyer (and the server-to-server notification) once a bill is paid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedirectFlow {
    /// Billplz notifies `/api/billplzCallback` and redirects the buyer to
    /// `/api/billplzRedirect` on this service.
    #[default]
    Callback,
    /// No callback. The buyer lands straight on the frontend's confirmation page for the
    /// order, so every bill needs an `orderId`.
    DirectConfirmation,
}

impl FromStr for RedirectFlow {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "callback" => Ok(Self::Callback),
            "direct" | "direct_confirmation" => Ok(Self::DirectConfirmation),
            _ => Err(ConfigError::InvalidFlow(s.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiEndpoints {
    pub live: String,
    pub sandbox: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            live: LIVE_API_BASE.to_string(),
            sandbox: SANDBOX_API_BASE.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct BillplzConfig {
    pub api_key: Option<String>,
    pub collection_id: Option<String>,
    pub x_signature_key: Option<String>,
    pub sandbox: bool,
    pub endpoints: ApiEndpoints,
    /// Public address of this service, used for the callback and redirect URLs.
    pub public_base_url: Url,
    pub frontend_base_url: Option<Url>,
    pub flow: RedirectFlow,
    pub timeout: Duration,
}

pub struct Credentials<'a> {
    pub api_key: &'a str,
    pub collection_id: &'a str,
}

impl BillplzConfig {
    /// Builds the config from a key lookup (the Shuttle secret store in production, a plain map
    /// in tests). Missing credentials are allowed here and reported per request instead.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let flow = get("BILLPLZ_REDIRECT_FLOW")
            .map(|value| value.parse())
            .transpose()?
            .unwrap_or_default();

        let timeout = match get("BILLPLZ_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(value)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let public_base_url = parse_base_url(
            "BACKEND_BASE_URL",
            get("BACKEND_BASE_URL").as_deref().unwrap_or(DEFAULT_PUBLIC_BASE_URL),
        )?;
        let frontend_base_url = get("FRONTEND_BASE_URL")
            .map(|value| parse_base_url("FRONTEND_BASE_URL", &value))
            .transpose()?;

        Ok(Self {
            api_key: get("BILLPLZ_API_KEY"),
            collection_id: get("BILLPLZ_COLLECTION_ID"),
            x_signature_key: get("BILLPLZ_X_SIGNATURE_KEY"),
            sandbox: get("BILLPLZ_SANDBOX").is_some_and(|value| value.trim() == "true"),
            endpoints: ApiEndpoints::default(),
            public_base_url,
            frontend_base_url,
            flow,
            timeout,
        })
    }

    pub fn credentials(&self) -> Result<Credentials<'_>, BillError> {
        match (self.api_key.as_deref(), self.collection_id.as_deref()) {
            (Some(api_key), Some(collection_id)) => Ok(Credentials {
                api_key,
                collection_id,
            }),
            _ => Err(BillError::Configuration),
        }
    }

    pub fn api_base(&self) -> &str {
        if self.sandbox {
            &self.endpoints.sandbox
        } else {
            &self.endpoints.live
        }
    }

    pub fn bills_url(&self) -> String {
        format!("{}/bills", self.api_base().trim_end_matches('/'))
    }

    pub fn callback_url(&self) -> Url {
        with_segments(&self.public_base_url, &["api", "billplzCallback"])
    }

    pub fn redirect_url(&self) -> Url {
        with_segments(&self.public_base_url, &["api", "billplzRedirect"])
    }

    /// Frontend page showing a single order. Falls back to the public base URL when no frontend
    /// is configured.
    pub fn confirmation_url(&self, order_id: &str) -> Url {
        let base = self
            .frontend_base_url
            .as_ref()
            .unwrap_or(&self.public_base_url);
        with_segments(base, &["order-confirmation", order_id])
    }
}

impl fmt::Debug for BillplzConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>");
        f.debug_struct("BillplzConfig")
            .field("api_key", &redact(&self.api_key))
            .field("collection_id", &self.collection_id)
            .field("x_signature_key", &redact(&self.x_signature_key))
            .field("sandbox", &self.sandbox)
            .field("endpoints", &self.endpoints)
            .field("public_base_url", &self.public_base_url.as_str())
            .field(
                "frontend_base_url",
                &self.frontend_base_url.as_ref().map(Url::as_str),
            )
            .field("flow", &self.flow)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_base_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base())
        .ok_or_else(|| ConfigError::InvalidUrl {
            key,
            value: value.to_string(),
        })
}

fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
