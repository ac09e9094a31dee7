//! Checkout scenarios using the `demo` catalog.
//!
//! Haircut ($50) plus two bottles of Repair Shampoo ($20 each) is a $90 subtotal. With 10% off
//! and a $5 tip the client pays $86.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use salon::{
    checkout::{
        CartAction, CartState, CheckoutError, CheckoutRequest, DiscountType, PaymentMethod,
        SelectedClient,
        input::{InputError, parse_amount, parse_discount, parse_quantity},
        reduce, totals,
    },
    fixtures::Fixture,
    report,
};

fn ring_up(actions: impl IntoIterator<Item = CartAction>) -> CartState {
    actions.into_iter().fold(CartState::new(USD), reduce)
}

#[test]
fn haircut_and_shampoo_with_discount_and_tip() -> TestResult {
    let fixture = Fixture::from_set("demo")?;
    let margaret = fixture
        .snapshot()?
        .clients
        .into_iter()
        .find(|client| client.id.as_str() == "c-margaret")
        .ok_or("c-margaret missing")?;

    let cart = ring_up([
        CartAction::add_service(fixture.service("haircut")?, USD),
        CartAction::add_product(fixture.product("shampoo")?, USD),
        CartAction::add_product(fixture.product("shampoo")?, USD),
        CartAction::SetClient(SelectedClient::from(&margaret)),
        CartAction::SetDiscount(parse_discount("10", DiscountType::Percentage, USD)?),
        CartAction::SetTip(parse_amount("5", USD)?),
        CartAction::SetPaymentMethod(PaymentMethod::Card),
    ]);

    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.item_count(), 3);

    let totals = totals(&cart)?;

    assert_eq!(totals.subtotal, Money::from_minor(90_00, USD));
    assert_eq!(totals.discount, Money::from_minor(9_00, USD));
    assert_eq!(totals.tip, Money::from_minor(5_00, USD));
    assert_eq!(totals.total, Money::from_minor(86_00, USD));

    let request = CheckoutRequest::from_cart(&cart)?;

    assert_eq!(request.total, 86_00);
    assert_eq!(request.currency, "USD");
    assert_eq!(request.client_id.as_ref().map(|id| id.as_str()), Some("c-margaret"));

    let payload = serde_json::to_value(&request)?;

    assert_eq!(payload["paymentMethod"], "card");
    assert_eq!(payload["lines"][1]["quantity"], 2);

    Ok(())
}

#[test]
fn fixed_discount_never_exceeds_subtotal() -> TestResult {
    let cart = ring_up([
        CartAction::quick_sale("Gift wrap", parse_amount("10.00", USD)?),
        CartAction::SetDiscount(parse_discount("15", DiscountType::Fixed, USD)?),
        CartAction::SetTip(parse_amount("2.50", USD)?),
    ]);

    let totals = totals(&cart)?;

    assert_eq!(totals.discount, Money::from_minor(10_00, USD));
    assert_eq!(totals.total, Money::from_minor(2_50, USD));

    Ok(())
}

#[test]
fn quantity_edits_follow_cashier_input() -> TestResult {
    let fixture = Fixture::from_set("demo")?;
    let cart = ring_up([CartAction::add_product(fixture.product("serum")?, USD)]);
    let id = cart.lines().first().map(|line| line.id.clone()).ok_or("no line")?;

    let cart = reduce(
        cart,
        CartAction::UpdateQuantity {
            id: id.clone(),
            quantity: i64::from(parse_quantity("3")?),
        },
    );

    assert_eq!(totals(&cart)?.subtotal, Money::from_minor(96_00, USD));

    let cart = reduce(
        cart,
        CartAction::UpdateQuantity {
            id,
            quantity: i64::from(parse_quantity("0")?),
        },
    );

    assert!(cart.is_empty());
    assert!(parse_quantity("two").is_err());

    Ok(())
}

#[test]
fn checkout_needs_items_and_a_tender() -> TestResult {
    let empty = ring_up([CartAction::SetPaymentMethod(PaymentMethod::Cash)]);

    assert!(matches!(
        CheckoutRequest::from_cart(&empty),
        Err(CheckoutError::EmptyCart)
    ));

    let unpaid = ring_up([CartAction::quick_sale(
        "Fringe trim",
        Money::from_decimal(Decimal::from(12), USD),
    )]);

    assert!(matches!(
        CheckoutRequest::from_cart(&unpaid),
        Err(CheckoutError::NoPaymentMethod)
    ));

    Ok(())
}

#[test]
fn receipt_prints_the_total() -> TestResult {
    let fixture = Fixture::from_set("demo")?;
    let cart = ring_up([
        CartAction::add_service(fixture.service("blow-dry")?, USD),
        CartAction::SetPaymentMethod(PaymentMethod::GiftCard),
    ]);

    let mut out = Vec::new();
    report::write_receipt(&mut out, &cart)?;
    let text = String::from_utf8(out)?;

    assert!(text.contains("Blow Dry"));
    assert!(text.contains("$30.00"));
    assert!(text.contains("gift_card"));

    Ok(())
}

#[test]
fn sub_cent_input_never_reaches_the_cart() {
    assert!(matches!(
        parse_amount("0.335", USD),
        Err(InputError::TooPrecise { places: 2, .. })
    ));
    assert!(matches!(
        parse_discount("0.999", DiscountType::Fixed, USD),
        Err(InputError::TooPrecise { places: 2, .. })
    ));
}
