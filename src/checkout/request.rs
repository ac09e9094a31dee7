//! Checkout Request
//!
//! The payload handed to the external sale mutation once the till is ready to charge.

use serde::Serialize;
use thiserror::Error;

use crate::{
    catalog::ClientId,
    checkout::{
        CartState, DiscountType, LineKind, PaymentMethod, TotalsError, minor_units, totals,
    },
};

/// Reasons a cart cannot be checked out.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to sell.
    #[error("cart is empty")]
    EmptyCart,

    /// No tender chosen.
    #[error("no payment method selected")]
    NoPaymentMethod,

    /// Totals could not be computed.
    #[error(transparent)]
    Totals(#[from] TotalsError),
}

/// One line of a sale, amounts in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    /// Service or product
    pub kind: LineKind,

    /// Display name
    pub name: String,

    /// Unit price in minor units
    pub unit_price: i64,

    /// Quantity sold
    pub quantity: u32,
}

/// A sale ready for the data layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Client, if one was attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,

    /// Lines in cart order
    pub lines: Vec<CheckoutLine>,

    /// ISO 4217 code
    pub currency: String,

    /// Subtotal in minor units
    pub subtotal: i64,

    /// Discount type as entered
    pub discount_type: DiscountType,

    /// Discount amount in minor units
    pub discount: i64,

    /// Tip in minor units
    pub tip: i64,

    /// Total in minor units
    pub total: i64,

    /// Tender
    pub payment_method: PaymentMethod,
}

impl CheckoutRequest {
    /// Build the sale payload for a cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart,
    /// [`CheckoutError::NoPaymentMethod`] when no method is selected, and
    /// [`CheckoutError::Totals`] if totals cannot be computed.
    pub fn from_cart(state: &CartState) -> Result<Self, CheckoutError> {
        if state.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if state.payment_method() == PaymentMethod::None {
            return Err(CheckoutError::NoPaymentMethod);
        }

        let totals = totals(state)?;

        let lines = state
            .lines()
            .iter()
            .map(|line| {
                Ok(CheckoutLine {
                    kind: line.kind,
                    name: line.name.clone(),
                    unit_price: minor_units(&line.unit_price)?,
                    quantity: line.quantity,
                })
            })
            .collect::<Result<Vec<_>, TotalsError>>()?;

        Ok(Self {
            client_id: state.client().map(|client| client.id.clone()),
            lines,
            currency: state.currency().iso_alpha_code.to_string(),
            subtotal: minor_units(&totals.subtotal)?,
            discount_type: state.discount().kind,
            discount: minor_units(&totals.discount)?,
            tip: minor_units(&totals.tip)?,
            total: minor_units(&totals.total)?,
            payment_method: state.payment_method(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::checkout::{CartAction, Discount, SelectedClient, reduce};

    use super::*;

    fn cart() -> CartState {
        [
            CartAction::quick_sale("Gift wrap", Money::from_minor(3_00, USD)),
            CartAction::SetDiscount(Discount::fixed(Decimal::ONE)),
            CartAction::SetClient(SelectedClient {
                id: ClientId::new("c1"),
                name: "Ada".to_string(),
            }),
        ]
        .into_iter()
        .fold(CartState::new(USD), reduce)
    }

    #[test]
    fn empty_cart_is_rejected() {
        let state = reduce(
            CartState::new(USD),
            CartAction::SetPaymentMethod(PaymentMethod::Cash),
        );

        assert!(matches!(
            CheckoutRequest::from_cart(&state),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn payment_method_is_required() {
        assert!(matches!(
            CheckoutRequest::from_cart(&cart()),
            Err(CheckoutError::NoPaymentMethod)
        ));
    }

    #[test]
    fn request_carries_totals_in_minor_units() -> TestResult {
        let state = reduce(cart(), CartAction::SetPaymentMethod(PaymentMethod::GiftCard));

        let request = CheckoutRequest::from_cart(&state)?;

        assert_eq!(request.client_id, Some(ClientId::new("c1")));
        assert_eq!(request.currency, "USD");
        assert_eq!(request.subtotal, 3_00);
        assert_eq!(request.discount, 1_00);
        assert_eq!(request.total, 2_00);

        let json = serde_json::to_value(&request)?;
        assert_eq!(json["paymentMethod"], "gift_card");
        assert_eq!(json["discountType"], "fixed");

        Ok(())
    }

    #[test]
    fn tip_beyond_minor_unit_range_is_an_overflow() {
        let state = [
            CartAction::SetTip(Money::from_decimal(
                Decimal::from(100_000_000_000_000_000_i64),
                USD,
            )),
            CartAction::SetPaymentMethod(PaymentMethod::Cash),
        ]
        .into_iter()
        .fold(cart(), reduce);

        assert!(matches!(
            CheckoutRequest::from_cart(&state),
            Err(CheckoutError::Totals(TotalsError::Overflow))
        ));
    }
}
