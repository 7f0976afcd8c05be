//! Conversational order-taking core for the barista voice agent.
//!
//! A [`BaristaAgent`] owns the [`Order`](barista_types::Order) of exactly one
//! voice session. The language model drives it through a small set of tools
//! (`set_drink_type`, `set_size`, `set_milk`, `add_extra`,
//! `set_customer_name`, `save_order`), each taking at most one string and
//! returning a short sentence that is spoken back to the customer.
//!
//! Saving an order is the only step with side effects:
//!
//! 1. the completeness gate reports missing fields as a plain message,
//! 2. the order is written to `orders/<name>_<YYYYMMDD_HHMMSS>.json`,
//! 3. an HTML receipt is rendered,
//! 4. the receipt is published to the frontend after a fixed delay by a
//!    detached task whose failures are only logged.
//!
//! # Usage
//!
//! ```rust,ignore
//! use barista_agent::{BaristaAgent, OrderStore};
//!
//! let mut agent = BaristaAgent::new(OrderStore::new("orders"));
//! agent.set_drink_type("Latte");
//! agent.set_size("medium");
//! agent.set_milk("oat milk");
//! agent.set_customer_name("Jamie");
//! let reply = agent.save_order().await?;
//! ```

mod agent;
mod dispatch;
mod error;
mod instructions;
mod publish;
mod receipt;
mod store;

pub use agent::{BaristaAgent, ORDER_ALREADY_PLACED};
pub use dispatch::{tool_definitions, ToolDefinition};
pub use error::AgentError;
pub use instructions::BARISTA_INSTRUCTIONS;
pub use publish::{spawn_delayed_publish, DEFAULT_PUBLISH_DELAY, ORDER_VISUALIZATION_TOPIC};
pub use receipt::{order_number, render_receipt};
pub use store::{order_file_name, OrderStore, DEFAULT_ORDERS_DIR};
