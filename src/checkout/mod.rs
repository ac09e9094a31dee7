//! Checkout
//!
//! The point-of-sale cart is a plain state value driven by [`CartAction`]s. [`reduce`] is a
//! total function: every action applies to every state without error, and anything that
//! could be invalid (quantities, amounts typed by a user) is rejected earlier by
//! [`input`].
//!
//! Money totals are derived on demand by [`totals()`] rather than stored.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::{Client, ClientId, Product, Service},
    ids::TypedId,
};

pub mod input;
pub mod request;
pub mod totals;

pub use request::{CheckoutError, CheckoutLine, CheckoutRequest};
pub use totals::{CartTotals, TotalsError, minor_units, totals};

/// Line Item Id
pub type LineItemId = TypedId<CartLineItem>;

/// What a cart line sells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// A service performed in the salon.
    Service,

    /// A retail product.
    Product,
}

/// One priced, quantity-bearing row of the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    /// Generated when the add action was built
    pub id: LineItemId,

    /// Service or product
    pub kind: LineKind,

    /// Display name; product lines merge on it
    pub name: String,

    /// Price of one unit
    pub unit_price: Money<'static, Currency>,

    /// Always at least one
    pub quantity: u32,

    /// Entered by hand at the till rather than picked from the catalog
    pub ad_hoc: bool,
}

impl CartLineItem {
    /// Whether another add of a product named `name` should bump this line.
    fn merges_with(&self, name: &str) -> bool {
        self.kind == LineKind::Product && !self.ad_hoc && self.name == name
    }
}

/// The client attached to a sale. Id and name travel together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedClient {
    /// Client id
    pub id: ClientId,

    /// Display name
    pub name: String,
}

impl From<&Client> for SelectedClient {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id.clone(),
            name: client.name.clone(),
        }
    }
}

/// How a discount value is interpreted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percent of the subtotal, 0 to 100.
    #[default]
    Percentage,

    /// Amount in major currency units.
    Fixed,
}

/// A cart discount: value and type are always set together.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Discount {
    /// Percent or amount, depending on `kind`
    pub value: Decimal,

    /// Interpretation of `value`
    pub kind: DiscountType,
}

impl Discount {
    /// A percentage discount, e.g. `10` for ten percent.
    #[must_use]
    pub fn percentage(value: Decimal) -> Self {
        Self {
            value,
            kind: DiscountType::Percentage,
        }
    }

    /// A fixed amount off.
    #[must_use]
    pub fn fixed(value: Decimal) -> Self {
        Self {
            value,
            kind: DiscountType::Fixed,
        }
    }

    /// Whether the discount takes nothing off.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

/// Tender selected at the till.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash
    Cash,

    /// Card
    Card,

    /// Gift card
    GiftCard,

    /// Nothing chosen yet
    #[default]
    None,
}

impl PaymentMethod {
    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::GiftCard => "gift_card",
            Self::None => "none",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "gift_card" | "gift-card" => Ok(Self::GiftCard),
            "none" => Ok(Self::None),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// A payment method name that is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(String);

/// The cart for one checkout session.
#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
    currency: &'static Currency,
    lines: Vec<CartLineItem>,
    client: Option<SelectedClient>,
    discount: Discount,
    tip: Money<'static, Currency>,
    payment_method: PaymentMethod,
}

impl CartState {
    /// An empty cart priced in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            lines: Vec::new(),
            client: None,
            discount: Discount::default(),
            tip: Money::from_minor(0, currency),
            payment_method: PaymentMethod::None,
        }
    }

    /// Cart currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Look up a line.
    #[must_use]
    pub fn line(&self, id: &LineItemId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Sum of quantities across lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Attached client.
    #[must_use]
    pub fn client(&self) -> Option<&SelectedClient> {
        self.client.as_ref()
    }

    /// Current discount.
    #[must_use]
    pub fn discount(&self) -> Discount {
        self.discount
    }

    /// Tip amount.
    #[must_use]
    pub fn tip(&self) -> Money<'static, Currency> {
        self.tip
    }

    /// Selected payment method.
    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Apply an action in place.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::AddService { id, name, price } => {
                self.push_line(id, LineKind::Service, name, price, false);
            }
            CartAction::AddProduct { id, name, price } => {
                if let Some(line) = self.lines.iter_mut().find(|line| line.merges_with(&name)) {
                    line.quantity = line.quantity.saturating_add(1);
                } else {
                    self.push_line(id, LineKind::Product, name, price, false);
                }
            }
            CartAction::AddQuickSale { id, name, price } => {
                self.push_line(id, LineKind::Product, name, price, true);
            }
            CartAction::RemoveItem(id) => {
                self.lines.retain(|line| line.id != id);
            }
            CartAction::UpdateQuantity { id, quantity } => {
                if quantity <= 0 {
                    self.lines.retain(|line| line.id != id);
                } else if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
                    line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                }
            }
            CartAction::SetClient(client) => self.client = Some(client),
            CartAction::ClearClient => self.client = None,
            CartAction::SetDiscount(discount) => self.discount = discount,
            CartAction::ClearDiscount => self.discount = Discount::default(),
            CartAction::SetTip(tip) => self.tip = tip,
            CartAction::SetPaymentMethod(method) => self.payment_method = method,
            CartAction::ClearCart => *self = Self::new(self.currency),
        }
    }

    fn push_line(
        &mut self,
        id: LineItemId,
        kind: LineKind,
        name: String,
        unit_price: Money<'static, Currency>,
        ad_hoc: bool,
    ) {
        self.lines.push(CartLineItem {
            id,
            kind,
            name,
            unit_price,
            quantity: 1,
            ad_hoc,
        });
    }
}

/// Everything that can happen to a cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Append a service line. Services never merge.
    AddService {
        /// Id for the new line
        id: LineItemId,
        /// Display name
        name: String,
        /// Unit price
        price: Money<'static, Currency>,
    },

    /// Add one of a product, merging with an existing line of the same name.
    AddProduct {
        /// Id for the line if a new one is created
        id: LineItemId,
        /// Display name
        name: String,
        /// Unit price
        price: Money<'static, Currency>,
    },

    /// Append a hand-priced product line. Quick sales never merge.
    AddQuickSale {
        /// Id for the new line
        id: LineItemId,
        /// Display name
        name: String,
        /// Unit price
        price: Money<'static, Currency>,
    },

    /// Drop a line.
    RemoveItem(LineItemId),

    /// Set a line's quantity; zero or less removes the line.
    UpdateQuantity {
        /// Line to change
        id: LineItemId,
        /// New quantity
        quantity: i64,
    },

    /// Attach a client.
    SetClient(SelectedClient),

    /// Detach the client.
    ClearClient,

    /// Replace the discount.
    SetDiscount(Discount),

    /// Reset the discount to zero percent.
    ClearDiscount,

    /// Replace the tip.
    SetTip(Money<'static, Currency>),

    /// Choose how the client pays.
    SetPaymentMethod(PaymentMethod),

    /// Start over.
    ClearCart,
}

impl CartAction {
    /// Add a catalog service, generating the line id.
    #[must_use]
    pub fn add_service(service: &Service, currency: &'static Currency) -> Self {
        Self::AddService {
            id: LineItemId::generate(),
            name: service.name.clone(),
            price: service.price_in(currency),
        }
    }

    /// Add a catalog product, generating the line id.
    #[must_use]
    pub fn add_product(product: &Product, currency: &'static Currency) -> Self {
        Self::AddProduct {
            id: LineItemId::generate(),
            name: product.name.clone(),
            price: product.price_in(currency),
        }
    }

    /// Ring up a custom item, generating the line id.
    #[must_use]
    pub fn quick_sale(name: impl Into<String>, price: Money<'static, Currency>) -> Self {
        Self::AddQuickSale {
            id: LineItemId::generate(),
            name: name.into(),
            price,
        }
    }
}

/// Apply `action` to `state`, returning the next state.
#[must_use]
pub fn reduce(mut state: CartState, action: CartAction) -> CartState {
    state.apply(action);
    state
}
