//! Buyer-field validation performed before any network call.
//!
//! Every rule is evaluated independently so the buyer sees all problems at once.

use super::buyer::BuyerInfo;
use crate::error::CheckoutError;

pub const NAME_REASON: &str = "Nome deve ter pelo menos 2 caracteres";
pub const PHONE_REASON: &str = "Telefone deve ter pelo menos 10 dígitos";
pub const EMAIL_REASON: &str = "E-mail inválido";
pub const CPF_REASON: &str = "CPF inválido";

const CPF_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<String>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(reasons) => reasons,
        }
    }

    pub fn into_result(self) -> Result<(), CheckoutError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(reasons) => Err(CheckoutError::Validation(reasons)),
        }
    }
}

pub fn validate(buyer: &BuyerInfo) -> ValidationResult {
    let mut reasons = Vec::new();

    if buyer.name.trim().chars().count() < 2 {
        reasons.push(NAME_REASON.to_string());
    }
    if digits(&buyer.phone).len() < 10 {
        reasons.push(PHONE_REASON.to_string());
    }
    if !is_valid_email(&buyer.email) {
        reasons.push(EMAIL_REASON.to_string());
    }
    if !is_valid_cpf(&buyer.national_id) {
        reasons.push(CPF_REASON.to_string());
    }

    if reasons.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(reasons)
    }
}

/// Accepts `local@domain.tld`: a single `@`, no whitespace, and a dot inside
/// the domain with characters on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let mut inner = domain.chars();
    inner.next();
    inner.next_back();
    inner.as_str().contains('.')
}

/// Checks an 11-digit CPF including both mod-11 check digits. Formatting
/// characters are ignored.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits = digits(cpf);
    if digits.len() != CPF_LEN {
        return false;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Weighted sum with weights counting down to 2, then `sum * 10 mod 11`,
/// where 10 collapses to 0.
fn check_digit(prefix: &[u32]) -> u32 {
    let top = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();

    match (sum * 10) % 11 {
        10 | 11 => 0,
        remainder => remainder,
    }
}

fn digits(input: &str) -> Vec<u32> {
    input.chars().filter_map(|c| c.to_digit(10)).collect()
}
