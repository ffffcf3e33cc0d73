#![allow(dead_code)]

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use pix_checkout::domain::buyer::BuyerInfo;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const VALID_CPF: &str = "529.982.247-25";

pub fn valid_buyer() -> BuyerInfo {
    BuyerInfo::new("Ana Souza", "(11) 98765-4321", "ana@example.com", VALID_CPF)
}

/// What the fake checkout backend answers and what it has seen.
pub struct BackendState {
    pub create_code: StatusCode,
    pub create_body: String,
    pub statuses: VecDeque<String>,
    pub paid: bool,
    pub received: Vec<Value>,
    pub status_polls: usize,
    pub polled_orders: Vec<String>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            create_code: StatusCode::OK,
            create_body: json!({
                "success": true,
                "order_id": 41,
                "qr_code": "00020126580014br.gov.bcb.pix",
                "qr_code_base64": "iVBORw0KGgo=",
                "payment_id": "pix_char_abc",
                "expires_at": "2030-01-01T12:00:00.000Z",
                "amount": 1990
            })
            .to_string(),
            statuses: VecDeque::new(),
            paid: false,
            received: Vec::new(),
            status_polls: 0,
            polled_orders: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct Backend {
    pub state: Arc<Mutex<BackendState>>,
}

impl Backend {
    pub fn answer_create(&self, code: StatusCode, body: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.create_code = code;
        state.create_body = body.into();
    }

    pub fn queue_statuses(&self, statuses: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state.statuses.extend(statuses.iter().map(|s| s.to_string()));
    }

    pub fn received(&self) -> Vec<Value> {
        self.state.lock().unwrap().received.clone()
    }

    pub fn status_polls(&self) -> usize {
        self.state.lock().unwrap().status_polls
    }

    pub fn polled_orders(&self) -> Vec<String> {
        self.state.lock().unwrap().polled_orders.clone()
    }

    /// Serves the backend on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route("/api/create-payment", post(create_payment))
            .route("/api/payment-status/{order_id}", get(payment_status))
            .route("/api/simulate-payment/{order_id}", post(simulate_payment))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn create_payment(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    let mut state = backend.state.lock().unwrap();
    state.received.push(body);
    (state.create_code, state.create_body.clone()).into_response()
}

async fn payment_status(State(backend): State<Backend>, Path(order_id): Path<String>) -> Response {
    if order_id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Order not found"}))).into_response();
    }

    let mut state = backend.state.lock().unwrap();
    state.status_polls += 1;
    state.polled_orders.push(order_id.clone());
    let status = match state.statuses.pop_front() {
        Some(status) => status,
        None if state.paid => "paid".to_string(),
        None => "pending".to_string(),
    };
    Json(json!({"status": status, "order_id": order_id})).into_response()
}

async fn simulate_payment(State(backend): State<Backend>, Path(order_id): Path<String>) -> Response {
    if order_id == "missing" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Erro ao simular pagamento. Certifique-se de estar em Dev Mode."})),
        )
            .into_response();
    }

    backend.state.lock().unwrap().paid = true;
    Json(json!({
        "success": true,
        "status": "paid",
        "order_id": order_id,
        "message": "Pagamento simulado com sucesso!"
    }))
    .into_response()
}
