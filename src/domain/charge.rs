use crate::error::{CheckoutError, MISSING_QR_MESSAGE};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// A charge value in reais, stored with centavo precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{:.2}", self.0.round_dp(2));
        write!(f, "R$ {}", text.replace('.', ","))
    }
}

/// Presentable payment data for one active checkout attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeResult {
    pub order_id: String,
    /// Base64 PNG payload or a full data URI.
    pub qr_image: Option<String>,
    /// The copy-and-paste PIX code.
    pub qr_text: Option<String>,
    pub payment_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub amount: Option<Amount>,
}

impl ChargeResult {
    /// Builds a result, refusing one that carries no QR data at all.
    pub fn new(
        order_id: impl Into<String>,
        qr_image: Option<String>,
        qr_text: Option<String>,
    ) -> Result<Self, CheckoutError> {
        let qr_image = qr_image.filter(|s| !s.trim().is_empty());
        let qr_text = qr_text.filter(|s| !s.trim().is_empty());
        if qr_image.is_none() && qr_text.is_none() {
            return Err(CheckoutError::Service(MISSING_QR_MESSAGE.to_string()));
        }

        Ok(Self {
            order_id: order_id.into(),
            qr_image,
            qr_text,
            payment_id: None,
            expires_at: None,
            amount: None,
        })
    }

    pub fn with_payment_id(mut self, payment_id: Option<String>) -> Self {
        self.payment_id = payment_id;
        self
    }

    /// Unparsable timestamps are dropped rather than failing the charge.
    pub fn with_expires_at(mut self, raw: Option<&str>) -> Self {
        self.expires_at = raw
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc));
        self
    }

    pub fn with_amount_cents(mut self, cents: Option<i64>) -> Self {
        self.amount = cents.map(Amount::from_cents);
        self
    }

    /// The QR image as something an `<img src>` or file writer can consume.
    pub fn qr_image_src(&self) -> Option<String> {
        self.qr_image.as_deref().map(|image| {
            if image.starts_with("data:") {
                image.to_string()
            } else {
                format!("{PNG_DATA_URI_PREFIX}{image}")
            }
        })
    }

    /// The copyable PIX code, unless the remote put an image in that slot.
    pub fn copyable_code(&self) -> Option<&str> {
        self.qr_text
            .as_deref()
            .filter(|code| !code.starts_with("data:image"))
    }
}
