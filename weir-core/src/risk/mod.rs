//! Pre-trade risk gate
//!
//! Stateful per-symbol position gatekeeper consulted before an order may
//! advance. The check and the position update run inside one exclusive
//! section, so two concurrent approvals for the same symbol can never
//! both pass on a stale prospective position.

use crate::journal::{AuditEvent, EventRecorder, RecorderError};
use crate::order::Order;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default per-order quantity ceiling
pub const DEFAULT_MAX_ORDER_SIZE: u64 = 1_000;

/// Default absolute net-position ceiling per symbol
pub const DEFAULT_MAX_POSITION: i64 = 2_000;

/// Static risk limits, immutable per engine instance
#[derive(Debug, Clone, Copy)]
pub struct RiskLimits {
    /// Maximum quantity allowed per order (inclusive)
    pub max_order_size: u64,
    /// Maximum absolute net position per symbol, symmetric for long and
    /// short (inclusive)
    pub max_position: i64,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_order_size: DEFAULT_MAX_ORDER_SIZE,
            max_position: DEFAULT_MAX_POSITION,
        }
    }
}

/// Reason an order failed the risk gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskRejection {
    OrderSizeExceeded {
        quantity: u64,
        limit: u64,
    },
    PositionLimitExceeded {
        symbol: String,
        current: i64,
        prospective: i64,
        limit: i64,
    },
}

impl fmt::Display for RiskRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskRejection::OrderSizeExceeded { quantity, limit } => {
                write!(f, "order size {} exceeds max order size {}", quantity, limit)
            }
            RiskRejection::PositionLimitExceeded {
                symbol,
                current,
                prospective,
                limit,
            } => {
                write!(
                    f,
                    "new position {} would exceed max position ±{} for {} (current: {})",
                    prospective, limit, symbol, current
                )
            }
        }
    }
}

/// Outcome of a risk check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskDecision {
    /// Order may advance; the position change is already applied
    Approved {
        old_position: i64,
        new_position: i64,
    },
    /// Order must be rejected; positions untouched
    Rejected(RiskRejection),
}

impl RiskDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, RiskDecision::Approved { .. })
    }
}

/// Risk engine - per-symbol position book plus static limits
///
/// Positions start at zero and are created lazily on first reference;
/// symbols never read or mutate one another's position.
pub struct RiskEngine {
    limits: RiskLimits,
    positions: Mutex<HashMap<String, i64>>,
    recorder: Arc<dyn EventRecorder>,
}

impl RiskEngine {
    pub fn new(limits: RiskLimits, recorder: Arc<dyn EventRecorder>) -> Self {
        info!(
            max_order_size = limits.max_order_size,
            max_position = limits.max_position,
            "risk engine ready"
        );

        Self {
            limits,
            positions: Mutex::new(HashMap::new()),
            recorder,
        }
    }

    /// Gate one order.
    ///
    /// Approval records RISK_APPROVED and POSITION_UPDATE and applies the
    /// position change, all under one lock; if either audit write fails
    /// the position is left untouched. Rejection records RISK_REJECTED
    /// and changes nothing. Both limit checks are inclusive: a value
    /// exactly at the ceiling passes.
    pub fn check(&self, order: &Order) -> Result<RiskDecision, RecorderError> {
        if order.quantity() > self.limits.max_order_size {
            return self.reject(
                order,
                RiskRejection::OrderSizeExceeded {
                    quantity: order.quantity(),
                    limit: self.limits.max_order_size,
                },
            );
        }

        let mut positions = self.positions.lock();
        let current = positions.get(order.symbol()).copied().unwrap_or(0);
        let prospective = current.saturating_add(order.side().signed(order.quantity()));

        if prospective.saturating_abs() > self.limits.max_position {
            drop(positions);
            return self.reject(
                order,
                RiskRejection::PositionLimitExceeded {
                    symbol: order.symbol().to_string(),
                    current,
                    prospective,
                    limit: self.limits.max_position,
                },
            );
        }

        // Approval: both audit writes land before the book moves, and the
        // lock is held throughout, so no partial update is observable.
        self.recorder.record(AuditEvent::RiskApproved {
            order_id: order.id().clone(),
            symbol: order.symbol().to_string(),
            side: order.side(),
            quantity: order.quantity(),
        })?;
        self.recorder.record(AuditEvent::PositionUpdate {
            order_id: order.id().clone(),
            symbol: order.symbol().to_string(),
            old_position: current,
            new_position: prospective,
        })?;
        positions.insert(order.symbol().to_string(), prospective);

        debug!(
            symbol = order.symbol(),
            old = current,
            new = prospective,
            "position updated"
        );

        Ok(RiskDecision::Approved {
            old_position: current,
            new_position: prospective,
        })
    }

    fn reject(
        &self,
        order: &Order,
        rejection: RiskRejection,
    ) -> Result<RiskDecision, RecorderError> {
        warn!(
            id = %order.id(),
            symbol = order.symbol(),
            reason = %rejection,
            "risk check rejected order"
        );

        self.recorder.record(AuditEvent::RiskRejected {
            order_id: order.id().clone(),
            symbol: order.symbol().to_string(),
            side: order.side(),
            quantity: order.quantity(),
            reason: rejection.to_string(),
        })?;

        Ok(RiskDecision::Rejected(rejection))
    }

    /// Net position for one symbol (zero when never traded)
    pub fn position(&self, symbol: &str) -> i64 {
        self.positions.lock().get(symbol).copied().unwrap_or(0)
    }

    /// Snapshot of every tracked position
    pub fn positions(&self) -> HashMap<String, i64> {
        self.positions.lock().clone()
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }
}
