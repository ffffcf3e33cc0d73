use crate::application::scheduler::{PollingScheduler, PollingSession};
use crate::config::CheckoutConfig;
use crate::domain::buyer::BuyerInfo;
use crate::domain::ports::{SharedGateway, SharedView, Step};
use crate::domain::validation;
use crate::error::Result;
use tracing::{debug, error, info};

/// Drives one checkout modal: validation, charge creation, then polling.
pub struct Checkout {
    gateway: SharedGateway,
    view: SharedView,
    scheduler: PollingScheduler,
}

impl Checkout {
    pub fn new(gateway: SharedGateway, view: SharedView, config: &CheckoutConfig) -> Self {
        let scheduler = PollingScheduler::new(
            gateway.clone(),
            view.clone(),
            config.polling,
            config.access_url.clone(),
        );
        Self {
            gateway,
            view,
            scheduler,
        }
    }

    pub fn scheduler(&self) -> &PollingScheduler {
        &self.scheduler
    }

    /// Resets to the form step, dropping any session left from before.
    pub async fn open(&self) {
        self.scheduler.cancel_active().await;
        self.view.show_step(Step::Form);
    }

    /// Validates the buyer, requests a charge and starts polling for it.
    ///
    /// Every failure is also rendered on the error step before it is returned;
    /// polling only starts once the charge carries presentable QR data.
    pub async fn submit(&self, buyer: BuyerInfo) -> Result<PollingSession> {
        if let Err(err) = validation::validate(&buyer).into_result() {
            debug!(error = %err, "buyer details rejected");
            self.view.show_error(&err.user_message());
            return Err(err);
        }

        self.view.show_step(Step::Loading);

        let charge = match self.gateway.create_charge(&buyer).await {
            Ok(charge) => charge,
            Err(err) => {
                error!(error = %err, "charge creation failed");
                self.view.show_error(&err.user_message());
                return Err(err);
            }
        };

        info!(order_id = %charge.order_id, amount = ?charge.amount, "charge created");
        self.view.show_charge(&charge);
        self.view.show_step(Step::Qr);

        Ok(self.scheduler.start(charge.order_id).await)
    }

    /// Closes the modal: polling stops and the order is forgotten.
    pub async fn close(&self) {
        self.scheduler.cancel_active().await;
    }
}
