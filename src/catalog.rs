//! Catalog
//!
//! Services, retail products and clients as delivered by the data loader.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    ids::TypedId,
    loyalty::{LoyaltyTier, tier_for_points},
};

/// Service Id
pub type ServiceId = TypedId<Service>;

/// Product Id
pub type ProductId = TypedId<Product>;

/// Client Id
pub type ClientId = TypedId<Client>;

/// A bookable service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service id
    pub id: ServiceId,

    /// Display name
    pub name: String,

    /// Booked length in minutes
    pub duration_minutes: u32,

    /// List price
    pub price: Decimal,

    /// Menu category (e.g. "Hair", "Nails")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Service {
    /// List price in the given currency.
    #[must_use]
    pub fn price_in(&self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_decimal(self.price, currency)
    }
}

/// A retail product sold at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Display name; checkout merges lines by this name.
    pub name: String,

    /// Shelf price
    pub price: Decimal,
}

impl Product {
    /// Shelf price in the given currency.
    #[must_use]
    pub fn price_in(&self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_decimal(self.price, currency)
    }
}

/// A client of the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Client id
    pub id: ClientId,

    /// Display name
    pub name: String,

    /// Contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Contact email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Accumulated loyalty points
    #[serde(default)]
    pub loyalty_points: u32,
}

impl Client {
    /// Loyalty tier earned by the client's points.
    #[must_use]
    pub fn loyalty_tier(&self) -> LoyaltyTier {
        tier_for_points(self.loyalty_points)
    }
}
