use super::buyer::BuyerInfo;
use super::charge::ChargeResult;
use super::state::PaymentState;
use super::status::PaymentStatus;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The remote payment service, seen from the checkout.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_charge(&self, buyer: &BuyerInfo) -> Result<ChargeResult>;
    async fn get_status(&self, order_id: &str) -> Result<PaymentStatus>;
}

/// Named steps of the checkout modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Form,
    Loading,
    Qr,
    Error,
}

impl Step {
    pub fn id(&self) -> &'static str {
        match self {
            Step::Form => "formStep",
            Step::Loading => "loadingStep",
            Step::Qr => "qrStep",
            Step::Error => "errorStep",
        }
    }
}

/// What the status element should currently say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDisplay {
    Waiting,
    /// The service answered with a value we do not know.
    Checking,
    Approved,
    NotApproved,
    Expired,
    TimedOut,
}

impl StatusDisplay {
    pub fn for_update(state: PaymentState, status: Option<&PaymentStatus>) -> Self {
        match state {
            PaymentState::Pending => match status {
                Some(PaymentStatus::Unrecognized(_)) => StatusDisplay::Checking,
                _ => StatusDisplay::Waiting,
            },
            PaymentState::Approved => StatusDisplay::Approved,
            PaymentState::Rejected => StatusDisplay::NotApproved,
            PaymentState::Expired => StatusDisplay::Expired,
            PaymentState::TimedOut => StatusDisplay::TimedOut,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            StatusDisplay::Waiting => "Aguardando pagamento...",
            StatusDisplay::Checking => "Verificando status...",
            StatusDisplay::Approved => "Pagamento aprovado!",
            StatusDisplay::NotApproved => "Pagamento não foi aprovado",
            StatusDisplay::Expired => "QR Code expirado",
            StatusDisplay::TimedOut => "Tempo de verificação esgotado",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StatusDisplay::NotApproved | StatusDisplay::Expired | StatusDisplay::TimedOut
        )
    }
}

/// The UI collaborator the checkout drives.
pub trait CheckoutView: Send + Sync {
    fn show_step(&self, step: Step);
    /// Sets the error text and switches to the error step.
    fn show_error(&self, message: &str);
    fn show_charge(&self, charge: &ChargeResult);
    fn show_status(&self, display: StatusDisplay);
    /// Confirmation view with the post-purchase access action.
    fn show_success(&self, access_url: &str);
}

pub type SharedGateway = Arc<dyn PaymentGateway>;
pub type SharedView = Arc<dyn CheckoutView>;
