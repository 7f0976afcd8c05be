//! Shared types for the barista voice-ordering backend.
//!
//! This crate holds the order model that every other crate in the
//! workspace agrees on: the in-progress [`Order`] collected during one
//! voice session, the validated [`CupSize`], the required [`OrderField`]s
//! and the [`OrderRecord`] wire shape written to disk.
//!
//! It deliberately has no async or I/O dependencies so the order model can
//! be reused by the agent core, the HTTP surface and tests alike.

mod order;

pub use order::{CupSize, Order, OrderField, OrderRecord, ParseSizeError};
