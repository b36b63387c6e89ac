//! Order lifecycle entity
//!
//! The state machine is a closed enumeration plus an explicit transition
//! table ([`OrderState::can_transition_to`]); an illegal transition is a
//! checked error, never an unchecked mutation. Construction and every
//! successful transition append to the audit journal before returning,
//! so the trail always leads the in-memory state.

use crate::core::{OrderId, OrderState, OrderType, Side};
use crate::journal::{AuditEvent, EventRecorder, RecorderError};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, error};

/// Failures raised by order construction and transitions
#[derive(Debug)]
pub enum OrderError {
    /// A constructor argument is outside its allowed domain
    InvalidField {
        field: &'static str,
        detail: &'static str,
    },
    /// The requested transition is not in the legal set; state unchanged
    IllegalTransition {
        id: OrderId,
        from: OrderState,
        to: OrderState,
    },
    /// The audit sink rejected a write
    Recorder(RecorderError),
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::InvalidField { field, detail } => {
                write!(f, "invalid order field '{}': {}", field, detail)
            }
            OrderError::IllegalTransition { id, from, to } => {
                write!(f, "illegal transition {} -> {} for order {}", from, to, id)
            }
            OrderError::Recorder(e) => write!(f, "audit write failed: {}", e),
        }
    }
}

impl std::error::Error for OrderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrderError::Recorder(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RecorderError> for OrderError {
    fn from(e: RecorderError) -> Self {
        OrderError::Recorder(e)
    }
}

/// A single resting order and its lifecycle state
///
/// State is mutated only through [`Order::transition`]; the field itself
/// is private so no caller can skip the table or the audit event.
pub struct Order {
    id: OrderId,
    symbol: String,
    side: Side,
    quantity: u64,
    order_type: OrderType,
    price: Option<Decimal>,
    state: OrderState,
    created_at: SystemTime,
    recorder: Arc<dyn EventRecorder>,
}

impl fmt::Debug for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Order")
            .field("id", &self.id)
            .field("symbol", &self.symbol)
            .field("side", &self.side)
            .field("quantity", &self.quantity)
            .field("order_type", &self.order_type)
            .field("price", &self.price)
            .field("state", &self.state)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Order {
    /// Create a new order in state NEW.
    ///
    /// Records exactly one ORDER_CREATED event on success; if the audit
    /// write fails no order is returned.
    pub fn new(
        symbol: String,
        side: Side,
        quantity: u64,
        order_type: OrderType,
        price: Option<Decimal>,
        recorder: Arc<dyn EventRecorder>,
    ) -> Result<Self, OrderError> {
        if symbol.is_empty() {
            return Err(OrderError::InvalidField {
                field: "symbol",
                detail: "must be non-empty",
            });
        }
        if quantity == 0 {
            return Err(OrderError::InvalidField {
                field: "quantity",
                detail: "must be positive",
            });
        }
        if order_type == OrderType::Limit && price.is_none() {
            return Err(OrderError::InvalidField {
                field: "price",
                detail: "required for limit orders",
            });
        }

        let order = Self {
            id: OrderId::new_random(),
            symbol,
            side,
            quantity,
            order_type,
            price,
            state: OrderState::New,
            created_at: SystemTime::now(),
            recorder,
        };

        order.recorder.record(AuditEvent::OrderCreated {
            order_id: order.id.clone(),
            symbol: order.symbol.clone(),
            side: order.side,
            quantity: order.quantity,
            order_type: order.order_type,
            price: order.price,
            state: order.state,
        })?;

        debug!(id = %order.id, symbol = %order.symbol, side = %order.side, quantity = order.quantity, "order created");
        Ok(order)
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn state(&self) -> OrderState {
        self.state
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Drive the order to `target`.
    ///
    /// A successful transition records exactly one STATE_CHANGE event
    /// before returning. An illegal target, including any attempt out of
    /// a terminal state and self-transitions, leaves the state untouched.
    pub fn transition(&mut self, target: OrderState) -> Result<(), OrderError> {
        if !self.state.can_transition_to(target) {
            error!(
                id = %self.id,
                from = %self.state,
                to = %target,
                "illegal order state transition attempted"
            );
            return Err(OrderError::IllegalTransition {
                id: self.id.clone(),
                from: self.state,
                to: target,
            });
        }

        self.recorder.record(AuditEvent::StateChange {
            order_id: self.id.clone(),
            symbol: self.symbol.clone(),
            old_state: self.state,
            new_state: target,
        })?;

        debug!(id = %self.id, from = %self.state, to = %target, "order state change");
        self.state = target;
        Ok(())
    }
}
