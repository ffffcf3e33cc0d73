use serde::Deserialize;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A status value as reported by one poll of `/api/payment-status`.
///
/// Parsing never fails: anything outside the known vocabulary lands in
/// `Unrecognized` with the raw value kept for logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PaymentStatus {
    Pending,
    WaitingPayment,
    Approved,
    Paid,
    Cancelled,
    Failed,
    Expired,
    Unrecognized(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::WaitingPayment => "waiting_payment",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Expired => "expired",
            PaymentStatus::Unrecognized(raw) => raw,
        }
    }
}

impl From<&str> for PaymentStatus {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => PaymentStatus::Pending,
            "waiting_payment" => PaymentStatus::WaitingPayment,
            "approved" => PaymentStatus::Approved,
            "paid" => PaymentStatus::Paid,
            "cancelled" => PaymentStatus::Cancelled,
            "failed" => PaymentStatus::Failed,
            "expired" => PaymentStatus::Expired,
            _ => PaymentStatus::Unrecognized(raw.to_string()),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        PaymentStatus::from(raw.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PaymentStatus::from(s))
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vocabulary() {
        assert_eq!(PaymentStatus::from("pending"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from("waiting_payment"), PaymentStatus::WaitingPayment);
        assert_eq!(PaymentStatus::from("approved"), PaymentStatus::Approved);
        assert_eq!(PaymentStatus::from("paid"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from("cancelled"), PaymentStatus::Cancelled);
        assert_eq!(PaymentStatus::from("failed"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from("expired"), PaymentStatus::Expired);
    }

    #[test]
    fn test_matching_ignores_case_and_padding() {
        assert_eq!(PaymentStatus::from(" PAID "), PaymentStatus::Paid);
    }

    #[test]
    fn test_unknown_value_is_kept() {
        let status: PaymentStatus = "foo".parse().unwrap();
        assert_eq!(status, PaymentStatus::Unrecognized("foo".into()));
        assert_eq!(status.to_string(), "foo");
    }

    #[test]
    fn test_deserializes_from_json_string() {
        #[derive(Deserialize)]
        struct Body {
            status: PaymentStatus,
        }
        let body: Body = serde_json::from_str(r#"{"status":"expired"}"#).unwrap();
        assert_eq!(body.status, PaymentStatus::Expired);
    }
}
