use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn new_random() -> Self {
        use rand::Rng;
        let id = rand::thread_rng().gen::<u128>();
        Self(format!("{:032x}", id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Order side (Buy or Sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Signed position delta contributed by `quantity` shares on this side
    pub fn signed(&self, quantity: u64) -> i64 {
        match self {
            Side::Buy => quantity as i64,
            Side::Sell => -(quantity as i64),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Execute at best available price; carries no price
    Market,
    /// Rest at the specified price
    Limit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
        }
    }
}

/// Lifecycle state of an order
///
/// `New` is the initial state; `Filled`, `Rejected` and `Cancelled` are
/// terminal. Legality of transitions is decided by [`OrderState::can_transition_to`],
/// never by assigning the field directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    New,
    Acked,
    Rejected,
    PartialFill,
    Filled,
    Cancelled,
}

impl OrderState {
    /// Terminal states admit no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderState::Filled | OrderState::Rejected | OrderState::Cancelled
        )
    }

    /// Explicit transition table.
    ///
    /// Anything not listed is illegal, including self-transitions and
    /// every attempt out of a terminal state.
    pub fn can_transition_to(&self, target: OrderState) -> bool {
        use OrderState::*;
        matches!(
            (self, target),
            (New, Acked)
                | (New, Rejected)
                | (Acked, Filled)
                | (Acked, PartialFill)
                | (Acked, Cancelled)
                | (PartialFill, Filled)
                | (PartialFill, Cancelled)
        )
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderState::New => write!(f, "NEW"),
            OrderState::Acked => write!(f, "ACKED"),
            OrderState::Rejected => write!(f, "REJECTED"),
            OrderState::PartialFill => write!(f, "PARTIAL_FILL"),
            OrderState::Filled => write!(f, "FILLED"),
            OrderState::Cancelled => write!(f, "CANCELLED"),
        }
    }
}
