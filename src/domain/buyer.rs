use serde::Serialize;

/// Buyer details as typed into the checkout form.
///
/// Fields are trimmed on construction; the value is treated as immutable once
/// it has been handed to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub national_id: String,
}

impl BuyerInfo {
    pub fn new(
        name: impl AsRef<str>,
        phone: impl AsRef<str>,
        email: impl AsRef<str>,
        national_id: impl AsRef<str>,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            phone: phone.as_ref().trim().to_string(),
            email: email.as_ref().trim().to_string(),
            national_id: national_id.as_ref().trim().to_string(),
        }
    }

    /// Builds the wire representation sent to `/api/create-payment`.
    pub fn to_request(&self) -> ChargeRequest<'_> {
        ChargeRequest {
            name: &self.name,
            phone: &self.phone,
            email: &self.email,
            cpf: &self.national_id,
        }
    }
}

/// Outbound body of a charge-creation call. Borrows from the buyer so it only
/// lives as long as one submission attempt.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChargeRequest<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub cpf: &'a str,
}
