use crate::domain::charge::ChargeResult;
use crate::domain::ports::{CheckoutView, StatusDisplay, Step};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Renders the checkout as plain text lines.
pub struct TerminalView {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalView {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // A closed stdout must not take the checkout down with it.
        let _ = writeln!(out, "{text}").and_then(|_| out.flush());
    }
}

impl CheckoutView for TerminalView {
    fn show_step(&self, step: Step) {
        debug!(step = step.id(), "switching checkout step");
        match step {
            Step::Form => self.line("Preencha seus dados para gerar o PIX."),
            Step::Loading => self.line("Gerando pagamento PIX..."),
            Step::Qr => self.line("Escaneie o QR Code ou use o código acima para pagar."),
            Step::Error => {}
        }
    }

    fn show_error(&self, message: &str) {
        self.line(&format!("Erro: {message}"));
    }

    fn show_charge(&self, charge: &ChargeResult) {
        self.line(&format!("Pedido: {}", charge.order_id));
        if let Some(amount) = charge.amount {
            self.line(&format!("Valor: {amount}"));
        }
        if let Some(expires_at) = charge.expires_at {
            self.line(&format!("Expira em: {}", expires_at.format("%d/%m/%Y %H:%M UTC")));
        }
        if let Some(src) = charge.qr_image_src() {
            self.line(&format!("QR Code disponível como imagem ({} bytes).", src.len()));
        }
        if let Some(code) = charge.copyable_code() {
            self.line("Código PIX copia e cola:");
            self.line(code);
        }
    }

    fn show_status(&self, display: StatusDisplay) {
        if display.is_error() {
            self.line(&format!("Falha: {}", display.text()));
        } else {
            self.line(&format!("Status: {}", display.text()));
        }
    }

    fn show_success(&self, access_url: &str) {
        self.line("Parabéns pela sua compra! Seu pagamento foi confirmado com sucesso!");
        self.line(&format!("Acesse: {access_url}"));
    }
}
