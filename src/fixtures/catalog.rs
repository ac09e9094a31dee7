//! Catalog Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;

use crate::{
    catalog::{Product, ProductId, Service, ServiceId},
    fixtures::FixtureError,
};

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of service key -> service fixture
    #[serde(default)]
    pub services: FxHashMap<String, ServiceFixture>,

    /// Map of product key -> product fixture
    #[serde(default)]
    pub products: FxHashMap<String, ProductFixture>,
}

/// Service Fixture
#[derive(Debug, Deserialize)]
pub struct ServiceFixture {
    /// Service name
    pub name: String,

    /// Booked length in minutes
    pub duration_minutes: u32,

    /// Service price (e.g., "45.00 USD")
    pub price: String,

    /// Menu category
    #[serde(default)]
    pub category: Option<String>,
}

impl ServiceFixture {
    /// Convert into a [`Service`] keyed by `key`, returning the price's currency too.
    ///
    /// # Errors
    ///
    /// Returns an error if the price string is malformed.
    pub fn try_into_service(
        self,
        key: &str,
    ) -> Result<(Service, &'static Currency), FixtureError> {
        let (price, currency) = parse_price(&self.price)?;

        let service = Service {
            id: ServiceId::new(key),
            name: self.name,
            duration_minutes: self.duration_minutes,
            price,
            category: self.category,
        };

        Ok((service, currency))
    }
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product price (e.g., "20.00 USD")
    pub price: String,
}

impl ProductFixture {
    /// Convert into a [`Product`] keyed by `key`, returning the price's currency too.
    ///
    /// # Errors
    ///
    /// Returns an error if the price string is malformed.
    pub fn try_into_product(
        self,
        key: &str,
    ) -> Result<(Product, &'static Currency), FixtureError> {
        let (price, currency) = parse_price(&self.price)?;

        let product = Product {
            id: ProductId::new(key),
            name: self.name,
            price,
        };

        Ok((product, currency))
    }
}

/// Parse price string (e.g., "2.99 USD") into a major-unit amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount
/// is not a non-negative decimal, or if the currency code is not ISO 4217.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = iso::find(currency_code)
        .ok_or_else(|| FixtureError::UnknownCurrency((*currency_code).to_string()))?;

    Ok((amount, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_rejects_negative_amount() {
        assert!(matches!(
            parse_price("-5.00 USD"),
            Err(FixtureError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_accepts_usd_and_eur() -> Result<(), FixtureError> {
        let (usd_amount, usd) = parse_price("45.00 USD")?;
        let (eur_amount, eur) = parse_price("2.50 EUR")?;

        assert_eq!(usd_amount, Decimal::from(45));
        assert_eq!(usd, USD);
        assert_eq!(eur_amount, Decimal::new(250, 2));
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn service_fixture_converts() -> Result<(), FixtureError> {
        let yaml = r#"
name: Haircut
duration_minutes: 45
price: "50.00 USD"
category: Hair
"#;
        let fixture: ServiceFixture = serde_norway::from_str(yaml)?;

        let (service, currency) = fixture.try_into_service("haircut")?;

        assert_eq!(service.id, ServiceId::new("haircut"));
        assert_eq!(service.duration_minutes, 45);
        assert_eq!(service.category.as_deref(), Some("Hair"));
        assert_eq!(currency, USD);

        Ok(())
    }
}
