//! Typed validation of tokenized messages
//!
//! Turns a [`RawMessage`] into the closed [`Message`] enum, enforcing
//! required-field and domain-value rules per message kind. Pure: no side
//! effects, and a failed validation never leaves partially validated
//! state behind.

use super::parser::RawMessage;
use super::tags;
use super::ValidationError;
use crate::core::{OrderType, Side};
use rust_decimal::Decimal;
use std::fmt;

/// A fully validated inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// 35=D: a single order to be risk-checked and tracked
    NewOrderSingle {
        symbol: String,
        side: Side,
        quantity: u64,
        order_type: OrderType,
        /// Present iff `order_type` is Limit
        price: Option<Decimal>,
    },
    /// 35=S: a two-sided quote; carries no order semantics
    Quote {
        symbol: String,
        bid_px: Decimal,
        offer_px: Decimal,
    },
}

impl Message {
    pub fn symbol(&self) -> &str {
        match self {
            Message::NewOrderSingle { symbol, .. } => symbol,
            Message::Quote { symbol, .. } => symbol,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::NewOrderSingle {
                symbol,
                side,
                quantity,
                order_type,
                price,
            } => {
                write!(f, "NewOrderSingle {} {} {} {}", symbol, side, quantity, order_type)?;
                if let Some(price) = price {
                    write!(f, " @ {}", price)?;
                }
                Ok(())
            }
            Message::Quote {
                symbol,
                bid_px,
                offer_px,
            } => {
                write!(f, "Quote {} bid {} offer {}", symbol, bid_px, offer_px)
            }
        }
    }
}

/// Validate a tokenized message into its typed form
pub fn validate(raw: &RawMessage) -> Result<Message, ValidationError> {
    match required(raw, tags::MSG_TYPE)? {
        "D" => validate_new_order_single(raw),
        "S" => validate_quote(raw),
        other => Err(invalid(
            tags::MSG_TYPE,
            other,
            "D (NewOrderSingle) or S (Quote)",
        )),
    }
}

fn validate_new_order_single(raw: &RawMessage) -> Result<Message, ValidationError> {
    let symbol = non_empty(raw, tags::SYMBOL)?;

    let side = match required(raw, tags::SIDE)? {
        "1" => Side::Buy,
        "2" => Side::Sell,
        other => return Err(invalid(tags::SIDE, other, "1 (Buy) or 2 (Sell)")),
    };

    let qty_raw = required(raw, tags::ORDER_QTY)?;
    let quantity: u64 = qty_raw
        .parse()
        .ok()
        .filter(|qty| *qty > 0)
        .ok_or_else(|| invalid(tags::ORDER_QTY, qty_raw, "positive integer"))?;

    let order_type = match required(raw, tags::ORD_TYPE)? {
        "1" => OrderType::Market,
        "2" => OrderType::Limit,
        other => return Err(invalid(tags::ORD_TYPE, other, "1 (Market) or 2 (Limit)")),
    };

    let price = match order_type {
        OrderType::Limit => Some(decimal(raw, tags::PRICE)?),
        // Market orders carry no price; a stray tag 44 is ignored
        OrderType::Market => None,
    };

    Ok(Message::NewOrderSingle {
        symbol,
        side,
        quantity,
        order_type,
        price,
    })
}

fn validate_quote(raw: &RawMessage) -> Result<Message, ValidationError> {
    let symbol = non_empty(raw, tags::SYMBOL)?;
    let bid_px = decimal(raw, tags::BID_PX)?;
    let offer_px = decimal(raw, tags::OFFER_PX)?;

    Ok(Message::Quote {
        symbol,
        bid_px,
        offer_px,
    })
}

fn required(raw: &RawMessage, tag: u32) -> Result<&str, ValidationError> {
    raw.get(tag).ok_or(ValidationError::MissingField {
        tag,
        name: tags::tag_name(tag),
    })
}

fn non_empty(raw: &RawMessage, tag: u32) -> Result<String, ValidationError> {
    let value = required(raw, tag)?;
    if value.is_empty() {
        return Err(invalid(tag, value, "non-empty value"));
    }
    Ok(value.to_string())
}

fn decimal(raw: &RawMessage, tag: u32) -> Result<Decimal, ValidationError> {
    let value = required(raw, tag)?;
    value
        .parse::<Decimal>()
        .map_err(|_| invalid(tag, value, "decimal price"))
}

fn invalid(tag: u32, value: &str, expected: &'static str) -> ValidationError {
    ValidationError::InvalidField {
        tag,
        name: tags::tag_name(tag),
        value: value.to_string(),
        expected,
    }
}
