//! The conversational order model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cup sizes offered by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CupSize {
    Small,
    Medium,
    Large,
}

impl CupSize {
    /// All sizes, smallest first.
    pub const ALL: [CupSize; 3] = [CupSize::Small, CupSize::Medium, CupSize::Large];

    /// Returns the lowercase label for this size.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for CupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name one of the three cup sizes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cup size: {0}")]
pub struct ParseSizeError(pub String);

impl FromStr for CupSize {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(ParseSizeError(s.to_string())),
        }
    }
}

/// The fields an order needs before it can be saved, in the order they are
/// reported back to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    DrinkType,
    Size,
    Milk,
    Name,
}

impl OrderField {
    /// Returns the spoken label for this field.
    pub fn label(self) -> &'static str {
        match self {
            Self::DrinkType => "drink type",
            Self::Size => "size",
            Self::Milk => "milk type",
            Self::Name => "customer name",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Persisted form of an order.
///
/// Serialized with camelCase keys (`drinkType`, `size`, `milk`, `extras`,
/// `name`) so the files stay readable by the web frontend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub drink_type: Option<String>,
    pub size: Option<CupSize>,
    pub milk: Option<String>,
    #[serde(default)]
    pub extras: Vec<String>,
    pub name: Option<String>,
}

/// A single customer's coffee order, built up one tool call at a time.
///
/// Free-text fields other than the customer name are normalized to
/// lowercase. Extras behave as an insertion-ordered set keyed by their
/// lowercase value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Order {
    drink_type: Option<String>,
    size: Option<CupSize>,
    milk: Option<String>,
    extras: Vec<String>,
    name: Option<String>,
}

impl Order {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drink_type(&self) -> Option<&str> {
        self.drink_type.as_deref()
    }

    pub fn size(&self) -> Option<CupSize> {
        self.size
    }

    pub fn milk(&self) -> Option<&str> {
        self.milk.as_deref()
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_drink_type(&mut self, drink_type: &str) {
        self.drink_type = Some(drink_type.to_lowercase());
    }

    pub fn set_size(&mut self, size: CupSize) {
        self.size = Some(size);
    }

    pub fn set_milk(&mut self, milk: &str) {
        self.milk = Some(milk.to_lowercase());
    }

    /// Adds an extra unless an equal (case-insensitive) one is already present.
    ///
    /// Returns `true` if the extra was appended.
    pub fn add_extra(&mut self, extra: &str) -> bool {
        let extra = extra.to_lowercase();
        if self.extras.contains(&extra) {
            return false;
        }
        self.extras.push(extra);
        true
    }

    /// Stores the customer name exactly as given.
    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    /// Returns the required fields that are still missing or empty.
    pub fn missing_fields(&self) -> Vec<OrderField> {
        let mut missing = Vec::new();
        if is_blank(&self.drink_type) {
            missing.push(OrderField::DrinkType);
        }
        if self.size.is_none() {
            missing.push(OrderField::Size);
        }
        if is_blank(&self.milk) {
            missing.push(OrderField::Milk);
        }
        if is_blank(&self.name) {
            missing.push(OrderField::Name);
        }
        missing
    }

    /// An order is complete once drink type, size, milk and name are set.
    /// Extras are optional.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn to_record(&self) -> OrderRecord {
        OrderRecord {
            drink_type: self.drink_type.clone(),
            size: self.size,
            milk: self.milk.clone(),
            extras: self.extras.clone(),
            name: self.name.clone(),
        }
    }

    /// Rebuilds an order from its persisted form, re-applying normalization.
    pub fn from_record(record: &OrderRecord) -> Self {
        let mut order = Self::new();
        if let Some(drink_type) = &record.drink_type {
            order.set_drink_type(drink_type);
        }
        order.size = record.size;
        if let Some(milk) = &record.milk {
            order.set_milk(milk);
        }
        for extra in &record.extras {
            order.add_extra(extra);
        }
        if let Some(name) = &record.name {
            order.set_name(name);
        }
        order
    }
}

impl From<&Order> for OrderRecord {
    fn from(order: &Order) -> Self {
        order.to_record()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}
