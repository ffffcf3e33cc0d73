use crate::config::CheckoutConfig;
use crate::domain::buyer::BuyerInfo;
use crate::domain::charge::ChargeResult;
use crate::domain::ports::PaymentGateway;
use crate::domain::status::PaymentStatus;
use crate::error::{CheckoutError, DEFAULT_SERVICE_MESSAGE, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// The service sends numeric ids today; strings are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OrderId {
    Text(String),
    Number(i64),
}

impl From<OrderId> for String {
    fn from(id: OrderId) -> Self {
        match id {
            OrderId::Text(text) => text,
            OrderId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatePaymentResponse {
    #[serde(default)]
    success: bool,
    order_id: Option<OrderId>,
    qr_code_base64: Option<String>,
    qr_code: Option<String>,
    error: Option<String>,
    // Metadata is kept loose: a value of an unexpected shape is dropped, not
    // allowed to fail the charge.
    payment_id: Option<Value>,
    expires_at: Option<Value>,
    amount: Option<Value>,
}

impl CreatePaymentResponse {
    fn payment_id(&self) -> Option<String> {
        match self.payment_id.as_ref()? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Amount in centavos, when the service sent a whole number.
    fn amount_cents(&self) -> Option<i64> {
        self.amount.as_ref().and_then(Value::as_i64)
    }
}

#[derive(Debug, Deserialize)]
struct PaymentStatusResponse {
    status: Option<PaymentStatus>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SimulatePaymentResponse {
    #[serde(default)]
    success: bool,
    status: Option<PaymentStatus>,
    error: Option<String>,
}

/// Talks to the checkout backend over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    http: Client,
    base_url: String,
    base: Url,
}

impl HttpPaymentGateway {
    pub fn new(config: &CheckoutConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CheckoutError::Config(format!("cannot build HTTP client: {e}")))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| CheckoutError::Config(format!("invalid base URL {base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(CheckoutError::Config(format!(
                "base URL {base_url} cannot carry a path"
            )));
        }

        Ok(Self {
            http,
            base_url,
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Asks a dev-mode backend to mark the order as paid.
    pub async fn simulate_payment(&self, order_id: &str) -> Result<PaymentStatus> {
        let url = self.endpoint(&["api", "simulate-payment", order_id]);
        let response = self.http.post(url).send().await?;

        let ok = response.status().is_success();
        let body: SimulatePaymentResponse = read_json(response).await?;
        match body.status {
            Some(status) if ok && body.success => Ok(status),
            _ => Err(service_error(body.error)),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_charge(&self, buyer: &BuyerInfo) -> Result<ChargeResult> {
        let url = self.endpoint(&["api", "create-payment"]);
        let response = self
            .http
            .post(url)
            .json(&buyer.to_request())
            .send()
            .await?;

        let ok = response.status().is_success();
        let body: CreatePaymentResponse = read_json(response).await?;
        if !ok || !body.success {
            return Err(service_error(body.error));
        }

        let payment_id = body.payment_id();
        let amount = body.amount_cents();
        let Some(order_id) = body.order_id else {
            return Err(service_error(None));
        };

        let charge = ChargeResult::new(order_id, body.qr_code_base64, body.qr_code)?
            .with_payment_id(payment_id)
            .with_expires_at(body.expires_at.as_ref().and_then(Value::as_str))
            .with_amount_cents(amount);
        Ok(charge)
    }

    async fn get_status(&self, order_id: &str) -> Result<PaymentStatus> {
        let url = self.endpoint(&["api", "payment-status", order_id]);
        let response = self.http.get(url).send().await?;

        let code = response.status();
        if !code.is_success() {
            debug!(%code, order_id, "status endpoint answered with an error code");
            return Err(CheckoutError::Service(format!(
                "status check returned HTTP {code}"
            )));
        }

        let body: PaymentStatusResponse = read_json(response).await?;
        body.status.ok_or_else(|| service_error(body.error))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        debug!(error = %e, "undecodable response body");
        CheckoutError::Service(DEFAULT_SERVICE_MESSAGE.to_string())
    })
}

fn service_error(message: Option<String>) -> CheckoutError {
    CheckoutError::Service(
        message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_MESSAGE.to_string()),
    )
}
