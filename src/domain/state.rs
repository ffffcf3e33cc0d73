use super::status::PaymentStatus;

/// Lifecycle state of one checkout as presented to the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentState {
    Pending,
    Approved,
    Rejected,
    Expired,
    /// The polling ceiling elapsed before the service reported an outcome.
    TimedOut,
}

impl PaymentState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentState::Pending)
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            PaymentState::Rejected | PaymentState::Expired | PaymentState::TimedOut
        )
    }
}

impl From<&PaymentStatus> for PaymentState {
    fn from(status: &PaymentStatus) -> Self {
        match status {
            PaymentStatus::Approved | PaymentStatus::Paid => PaymentState::Approved,
            PaymentStatus::Cancelled | PaymentStatus::Failed => PaymentState::Rejected,
            PaymentStatus::Expired => PaymentState::Expired,
            PaymentStatus::Pending
            | PaymentStatus::WaitingPayment
            | PaymentStatus::Unrecognized(_) => PaymentState::Pending,
        }
    }
}
