//! The per-session barista: order state plus the tools that mutate it.

use crate::error::AgentError;
use crate::publish::{spawn_delayed_publish, DEFAULT_PUBLISH_DELAY};
use crate::receipt::render_receipt;
use crate::store::OrderStore;
use barista_types::{CupSize, Order};
use barista_voice::DataPublisher;
use chrono::Local;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Reply given to any tool call once the order has been saved.
pub const ORDER_ALREADY_PLACED: &str = "Your order has already been placed.";

/// Collects one customer's order over a single voice session.
///
/// Every tool returns the sentence the agent should relay to the customer.
/// Validation problems are reported in that sentence rather than as errors;
/// only [`save_order`](Self::save_order) can fail, and only when the order
/// cannot be written to disk.
pub struct BaristaAgent {
    order: Order,
    store: OrderStore,
    publisher: Option<Arc<dyn DataPublisher>>,
    publish_delay: Duration,
    finalized: bool,
}

impl fmt::Debug for BaristaAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaristaAgent")
            .field("order", &self.order)
            .field("store", &self.store)
            .field("has_publisher", &self.publisher.is_some())
            .field("publish_delay", &self.publish_delay)
            .field("finalized", &self.finalized)
            .finish()
    }
}

impl BaristaAgent {
    /// Creates an agent with an empty order and no publisher.
    pub fn new(store: OrderStore) -> Self {
        Self {
            order: Order::new(),
            store,
            publisher: None,
            publish_delay: DEFAULT_PUBLISH_DELAY,
            finalized: false,
        }
    }

    /// Sets the channel used to deliver the receipt to the frontend.
    pub fn with_publisher(mut self, publisher: Arc<dyn DataPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn with_publish_delay(mut self, delay: Duration) -> Self {
        self.publish_delay = delay;
        self
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Whether the order has been saved. A finalized order no longer changes.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn set_drink_type(&mut self, drink_type: &str) -> String {
        if self.finalized {
            return ORDER_ALREADY_PLACED.to_string();
        }
        self.order.set_drink_type(drink_type);
        info!("Set drink type to: {}", drink_type);
        format!("Great choice! A {} it is.", drink_type)
    }

    pub fn set_size(&mut self, size: &str) -> String {
        if self.finalized {
            return ORDER_ALREADY_PLACED.to_string();
        }
        let Ok(parsed) = size.parse::<CupSize>() else {
            info!("Rejected size: {}", size);
            return "Sorry, we only have small, medium, or large sizes available.".to_string();
        };
        self.order.set_size(parsed);
        info!("Set size to: {}", size);
        format!("Got it! {} size.", size)
    }

    pub fn set_milk(&mut self, milk_type: &str) -> String {
        if self.finalized {
            return ORDER_ALREADY_PLACED.to_string();
        }
        self.order.set_milk(milk_type);
        info!("Set milk to: {}", milk_type);
        format!("Perfect! {} noted.", milk_type)
    }

    pub fn add_extra(&mut self, extra: &str) -> String {
        if self.finalized {
            return ORDER_ALREADY_PLACED.to_string();
        }
        if self.order.add_extra(extra) {
            info!("Added extra: {}", extra);
            format!("Added {} to your order!", extra)
        } else {
            info!("Extra already in order: {}", extra);
            format!("{} is already in your order!", extra)
        }
    }

    pub fn set_customer_name(&mut self, name: &str) -> String {
        if self.finalized {
            return ORDER_ALREADY_PLACED.to_string();
        }
        self.order.set_name(name);
        info!("Set customer name to: {}", name);
        format!("Thanks {}!", name)
    }

    /// Finalizes the order.
    ///
    /// An incomplete order is answered with the list of missing fields and
    /// nothing is written. A complete order is saved to the store, its
    /// receipt is scheduled for publication after the publish delay, and a
    /// spoken summary is returned without waiting for that publication.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if the orders directory or file cannot be
    /// written.
    pub async fn save_order(&mut self) -> Result<String, AgentError> {
        if self.finalized {
            return Ok(ORDER_ALREADY_PLACED.to_string());
        }

        let missing = self.order.missing_fields();
        if !missing.is_empty() {
            let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
            info!(missing = ?labels, "order not ready to save");
            return Ok(format!(
                "Cannot save order yet. Still need: {}",
                labels.join(", ")
            ));
        }

        let now = Local::now();
        self.store.save(&self.order.to_record(), now).await?;
        self.finalized = true;

        let receipt = render_receipt(&self.order, now);
        spawn_delayed_publish(self.publisher.clone(), receipt, self.publish_delay);

        Ok(self.summary())
    }

    fn summary(&self) -> String {
        let extras = if self.order.extras().is_empty() {
            "none".to_string()
        } else {
            self.order.extras().join(", ")
        };
        format!(
            "Perfect! Your order has been saved successfully. Order summary: {} {} with {}, extras: {}, for {}. Your delicious coffee will be ready shortly!",
            self.order.size().map(CupSize::as_str).unwrap_or_default(),
            self.order.drink_type().unwrap_or_default(),
            self.order.milk().unwrap_or_default(),
            extras,
            self.order.name().unwrap_or_default(),
        )
    }
}
