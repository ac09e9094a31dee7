//! Till Input
//!
//! Parsing for values typed at the till. Whatever passes here is safe to dispatch to the
//! cart reducer.

use std::str::FromStr;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::checkout::{Discount, DiscountType};

/// Rejected till input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// Not a whole number.
    #[error("invalid quantity: {0:?}")]
    InvalidQuantity(String),

    /// Not a decimal amount.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Below zero.
    #[error("{0} must not be negative")]
    Negative(&'static str),

    /// Percentage above 100.
    #[error("percentage discount must be between 0 and 100, got {0}")]
    PercentageOutOfRange(Decimal),

    /// More decimal places than the currency's minor unit.
    #[error("{value} has more than {places} decimal places")]
    TooPrecise {
        /// The value as typed.
        value: Decimal,
        /// Decimal places the currency allows.
        places: u32,
    },
}

/// Parse a quantity. Zero is accepted and removes the line when dispatched.
///
/// # Errors
///
/// Returns [`InputError::InvalidQuantity`] for anything but a whole number and
/// [`InputError::Negative`] for negative numbers.
pub fn parse_quantity(text: &str) -> Result<u32, InputError> {
    let trimmed = text.trim();

    let value = i64::from_str(trimmed).map_err(|_err| InputError::InvalidQuantity(trimmed.to_string()))?;

    if value < 0 {
        return Err(InputError::Negative("quantity"));
    }

    u32::try_from(value).map_err(|_err| InputError::InvalidQuantity(trimmed.to_string()))
}

/// Parse a money amount in major units, e.g. `"12.50"`.
///
/// # Errors
///
/// Returns [`InputError::InvalidAmount`] for text that is not a decimal number,
/// [`InputError::Negative`] for negative amounts and [`InputError::TooPrecise`] for
/// fractions of the currency's minor unit.
pub fn parse_amount(
    text: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, InputError> {
    let value = parse_decimal(text)?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(InputError::Negative("amount"));
    }

    Ok(Money::from_decimal(within_minor_unit(value, currency)?, currency))
}

/// Parse a discount value for the given type.
///
/// # Errors
///
/// Returns [`InputError::InvalidAmount`] for text that is not a decimal number,
/// [`InputError::Negative`] for negative values,
/// [`InputError::PercentageOutOfRange`] for percentages above 100 and
/// [`InputError::TooPrecise`] for fixed amounts finer than `currency` allows.
pub fn parse_discount(
    text: &str,
    kind: DiscountType,
    currency: &'static Currency,
) -> Result<Discount, InputError> {
    let value = parse_decimal(text)?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(InputError::Negative("discount"));
    }

    match kind {
        DiscountType::Percentage if value > Decimal::ONE_HUNDRED => {
            Err(InputError::PercentageOutOfRange(value))
        }
        DiscountType::Percentage => Ok(Discount { value, kind }),
        DiscountType::Fixed => Ok(Discount {
            value: within_minor_unit(value, currency)?,
            kind,
        }),
    }
}

fn parse_decimal(text: &str) -> Result<Decimal, InputError> {
    let trimmed = text.trim();

    Decimal::from_str(trimmed).map_err(|_err| InputError::InvalidAmount(trimmed.to_string()))
}

/// Trailing zeros are fine (`"12.500"`), anything finer than a cent for USD is not.
fn within_minor_unit(value: Decimal, currency: &Currency) -> Result<Decimal, InputError> {
    let places = currency.exponent;

    if value.normalize().scale() > places {
        return Err(InputError::TooPrecise { value, places });
    }

    Ok(value)
}
