//! Cart Totals

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::checkout::{CartState, Discount, DiscountType};

/// Errors deriving cart totals.
#[derive(Debug, Error)]
pub enum TotalsError {
    /// A line total or the subtotal does not fit in minor units.
    #[error("cart total overflowed")]
    Overflow,

    /// Percentage calculation could not be represented.
    #[error("percentage conversion overflowed")]
    PercentConversion,

    /// Money arithmetic failed, e.g. a tip in another currency.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Derived money figures for a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    /// Sum of unit price times quantity
    pub subtotal: Money<'static, Currency>,

    /// Amount taken off, never more than the subtotal
    pub discount: Money<'static, Currency>,

    /// Tip as entered
    pub tip: Money<'static, Currency>,

    /// `subtotal - discount + tip`
    pub total: Money<'static, Currency>,
}

/// Compute subtotal, discount, tip and total for `state`.
///
/// All arithmetic is done on exact minor units.
///
/// # Errors
///
/// Returns [`TotalsError::Overflow`] if an amount leaves the `i64` minor-unit range and
/// [`TotalsError::Money`] if a line or tip is in a different currency from the cart or
/// carries fractions of a minor unit.
pub fn totals(state: &CartState) -> Result<CartTotals, TotalsError> {
    let currency = state.currency();

    let subtotal = state.lines().iter().try_fold(0_i64, |acc, line| {
        ensure_currency(currency, line.unit_price)?;

        let line_minor = minor_units(&line.unit_price)?
            .checked_mul(i64::from(line.quantity))
            .ok_or(TotalsError::Overflow)?;

        acc.checked_add(line_minor).ok_or(TotalsError::Overflow)
    })?;

    ensure_currency(currency, state.tip())?;

    let tip = minor_units(&state.tip())?;
    let discount = discount_amount(state.discount(), subtotal, currency)?;
    let total = subtotal
        .checked_sub(discount)
        .and_then(|net| net.checked_add(tip))
        .ok_or(TotalsError::Overflow)?;

    Ok(CartTotals {
        subtotal: Money::from_minor(subtotal, currency),
        discount: Money::from_minor(discount, currency),
        tip: Money::from_minor(tip, currency),
        total: Money::from_minor(total, currency),
    })
}

/// Exact minor units of `money`.
///
/// # Errors
///
/// Returns [`TotalsError::Overflow`] if the amount does not fit in `i64` minor units and
/// [`TotalsError::Money`] if it has a fraction of a minor unit.
pub fn minor_units(money: &Money<'static, Currency>) -> Result<i64, TotalsError> {
    money.try_to_minor_units().map_err(|err| match err {
        MoneyError::Overflow => TotalsError::Overflow,
        other => TotalsError::Money(other),
    })
}

fn ensure_currency(
    currency: &'static Currency,
    money: Money<'static, Currency>,
) -> Result<(), MoneyError> {
    if money.currency() == currency {
        Ok(())
    } else {
        Err(MoneyError::CurrencyMismatch {
            expected: currency.iso_alpha_code,
            actual: money.currency().iso_alpha_code,
        })
    }
}

/// Minor units a discount takes off `subtotal`, clamped to `0..=subtotal`.
fn discount_amount(
    discount: Discount,
    subtotal: i64,
    currency: &'static Currency,
) -> Result<i64, TotalsError> {
    let minor = match discount.kind {
        DiscountType::Percentage => {
            let percent = Percentage::from(discount.value / Decimal::ONE_HUNDRED);

            percent_of_minor(percent, subtotal)?
        }
        DiscountType::Fixed => minor_units(&Money::from_decimal(discount.value, currency))?,
    };

    Ok(minor.clamp(0, subtotal.max(0)))
}

/// `percent` of `minor`, rounded half away from zero.
fn percent_of_minor(percent: Percentage, minor: i64) -> Result<i64, TotalsError> {
    let applied = (percent * Decimal::ONE)
        .checked_mul(Decimal::from(minor))
        .ok_or(TotalsError::PercentConversion)?;

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(TotalsError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};
    use testresult::TestResult;

    use crate::checkout::{CartAction, LineItemId, reduce};

    use super::*;

    fn usd(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, USD)
    }

    fn scenario_cart() -> CartState {
        let actions = [
            CartAction::AddService {
                id: LineItemId::new("cut"),
                name: "Haircut".to_string(),
                price: usd(50_00),
            },
            CartAction::AddProduct {
                id: LineItemId::new("shampoo"),
                name: "Shampoo".to_string(),
                price: usd(20_00),
            },
            CartAction::AddProduct {
                id: LineItemId::new("shampoo-2"),
                name: "Shampoo".to_string(),
                price: usd(20_00),
            },
            CartAction::SetDiscount(Discount::percentage(Decimal::from(10))),
            CartAction::SetTip(usd(5_00)),
        ];

        actions.into_iter().fold(CartState::new(USD), reduce)
    }

    #[test]
    fn percentage_discount_total() -> TestResult {
        let totals = totals(&scenario_cart())?;

        assert_eq!(totals.subtotal, usd(90_00));
        assert_eq!(totals.discount, usd(9_00));
        assert_eq!(totals.tip, usd(5_00));
        assert_eq!(totals.total, usd(86_00));

        Ok(())
    }

    #[test]
    fn fixed_discount_is_clamped_to_subtotal() -> TestResult {
        let state = reduce(
            scenario_cart(),
            CartAction::SetDiscount(Discount::fixed(Decimal::from(500))),
        );

        let totals = totals(&state)?;

        assert_eq!(totals.discount, usd(90_00));
        assert_eq!(totals.total, usd(5_00));

        Ok(())
    }

    #[test]
    fn oversized_percentage_is_clamped_to_subtotal() -> TestResult {
        let state = reduce(
            scenario_cart(),
            CartAction::SetDiscount(Discount::percentage(Decimal::from(150))),
        );

        assert_eq!(totals(&state)?.discount, usd(90_00));

        Ok(())
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(
            percent_of_minor(Percentage::from(Decimal::new(125, 3)), 1_00)?,
            13
        );

        Ok(())
    }

    #[test]
    fn empty_cart_is_zero() -> TestResult {
        let totals = totals(&CartState::new(USD))?;

        assert_eq!(totals.total, usd(0));

        Ok(())
    }

    #[test]
    fn tip_in_other_currency_is_an_error() {
        let state = reduce(
            CartState::new(USD),
            CartAction::SetTip(Money::from_minor(5_00, EUR)),
        );

        assert!(matches!(totals(&state), Err(TotalsError::Money(_))));
    }

    #[test]
    fn huge_quantity_overflows() {
        let state = reduce(
            reduce(
                CartState::new(USD),
                CartAction::AddProduct {
                    id: LineItemId::new("gold"),
                    name: "Gold leaf".to_string(),
                    price: usd(i64::MAX / 2),
                },
            ),
            CartAction::UpdateQuantity {
                id: LineItemId::new("gold"),
                quantity: 3,
            },
        );

        assert!(matches!(totals(&state), Err(TotalsError::Overflow)));
    }

    #[test]
    fn huge_unit_price_is_an_overflow_not_zero() {
        let state = reduce(
            CartState::new(USD),
            CartAction::quick_sale(
                "Big",
                Money::from_decimal(Decimal::from(100_000_000_000_000_000_i64), USD),
            ),
        );

        assert!(matches!(totals(&state), Err(TotalsError::Overflow)));
    }

    #[test]
    fn huge_tip_is_an_overflow_not_zero() {
        let state = reduce(
            scenario_cart(),
            CartAction::SetTip(Money::from_decimal(
                Decimal::from(100_000_000_000_000_000_i64),
                USD,
            )),
        );

        assert!(matches!(totals(&state), Err(TotalsError::Overflow)));
    }

    #[test]
    fn sub_cent_amounts_are_rejected_rather_than_truncated() {
        let state = reduce(
            CartState::new(USD),
            CartAction::quick_sale("Pin", Money::from_decimal(Decimal::new(335, 3), USD)),
        );

        assert!(matches!(
            totals(&state),
            Err(TotalsError::Money(MoneyError::PrecisionLoss))
        ));
    }
}
