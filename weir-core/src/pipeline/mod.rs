//! Pipeline orchestrator
//!
//! Sequences validate → construct → risk-check → transition for one
//! inbound message, run-to-completion. A risk rejection is a normal
//! terminal outcome, not an error; validation failures abort before any
//! order or position side effect; an audit-sink failure aborts the run
//! wherever it strikes. There are no retries: the caller decides whether
//! a corrected message becomes a brand-new run.

use crate::core::OrderState;
use crate::journal::{EventRecorder, RecorderError};
use crate::order::{Order, OrderError};
use crate::protocol::{self, Message, ValidationError, DEFAULT_DELIMITER};
use crate::risk::{RiskDecision, RiskEngine, RiskLimits, RiskRejection};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Fatal pipeline failure
///
/// Risk rejections are deliberately absent: they surface as
/// [`Outcome::Rejected`], never as an error.
#[derive(Debug)]
pub enum PipelineError {
    /// The message failed tokenization or validation; nothing was created
    Validation(ValidationError),
    /// Order construction or transition failed. An `IllegalTransition`
    /// here means an orchestration defect: the fixed sequence below
    /// only requests transitions the table allows.
    Order(OrderError),
    /// The audit sink failed; the run cannot be trusted without its trail
    Recorder(RecorderError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Validation(e) => write!(f, "{}", e),
            PipelineError::Order(e) => write!(f, "{}", e),
            PipelineError::Recorder(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Validation(e) => Some(e),
            PipelineError::Order(e) => Some(e),
            PipelineError::Recorder(e) => Some(e),
        }
    }
}

impl From<ValidationError> for PipelineError {
    fn from(e: ValidationError) -> Self {
        PipelineError::Validation(e)
    }
}

impl From<RecorderError> for PipelineError {
    fn from(e: RecorderError) -> Self {
        PipelineError::Recorder(e)
    }
}

impl From<OrderError> for PipelineError {
    fn from(e: OrderError) -> Self {
        match e {
            // Surface audit failures uniformly regardless of which stage hit one
            OrderError::Recorder(e) => PipelineError::Recorder(e),
            other => PipelineError::Order(other),
        }
    }
}

/// Terminal outcome of one pipeline run
#[derive(Debug)]
pub enum Outcome {
    /// Order approved, acknowledged and filled; position already applied
    Filled {
        order: Order,
        old_position: i64,
        new_position: i64,
    },
    /// Order rejected by the risk gate; position untouched
    Rejected { order: Order, reason: RiskRejection },
    /// Quote validated; quotes create no order and touch no position
    QuoteAccepted {
        symbol: String,
        bid_px: Decimal,
        offer_px: Decimal,
    },
}

impl Outcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, Outcome::Filled { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Filled {
                order,
                old_position,
                new_position,
            } => {
                write!(
                    f,
                    "FILLED {} {} {} (position {} -> {})",
                    order.symbol(),
                    order.side(),
                    order.quantity(),
                    old_position,
                    new_position
                )
            }
            Outcome::Rejected { order, reason } => {
                write!(
                    f,
                    "REJECTED {} {} {}: {}",
                    order.symbol(),
                    order.side(),
                    order.quantity(),
                    reason
                )
            }
            Outcome::QuoteAccepted {
                symbol,
                bid_px,
                offer_px,
            } => {
                write!(f, "QUOTE {} bid {} offer {}", symbol, bid_px, offer_px)
            }
        }
    }
}

/// The pipeline: owns the risk engine and the injected audit recorder
pub struct Pipeline {
    risk: RiskEngine,
    recorder: Arc<dyn EventRecorder>,
    delimiter: char,
}

impl Pipeline {
    pub fn new(limits: RiskLimits, recorder: Arc<dyn EventRecorder>) -> Self {
        Self {
            risk: RiskEngine::new(limits, recorder.clone()),
            recorder,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Use a different field delimiter (e.g. SOH for real FIX streams)
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Run one raw message through tokenize → validate → submit
    pub fn process(&self, raw: &str) -> Result<Outcome, PipelineError> {
        let fields = protocol::parse(raw, self.delimiter)?;
        let message = protocol::validate(&fields)?;
        self.submit(message)
    }

    /// Run an already-validated message to completion
    pub fn submit(&self, message: Message) -> Result<Outcome, PipelineError> {
        match message {
            Message::NewOrderSingle {
                symbol,
                side,
                quantity,
                order_type,
                price,
            } => {
                let mut order = Order::new(
                    symbol,
                    side,
                    quantity,
                    order_type,
                    price,
                    self.recorder.clone(),
                )?;

                match self.risk.check(&order)? {
                    RiskDecision::Approved {
                        old_position,
                        new_position,
                    } => {
                        order.transition(OrderState::Acked)?;
                        // No partial fills modeled here; an approved order fills in full
                        order.transition(OrderState::Filled)?;

                        info!(
                            id = %order.id(),
                            symbol = order.symbol(),
                            old_position,
                            new_position,
                            "order filled"
                        );
                        Ok(Outcome::Filled {
                            order,
                            old_position,
                            new_position,
                        })
                    }
                    RiskDecision::Rejected(reason) => {
                        order.transition(OrderState::Rejected)?;

                        warn!(id = %order.id(), symbol = order.symbol(), %reason, "order rejected");
                        Ok(Outcome::Rejected { order, reason })
                    }
                }
            }
            Message::Quote {
                symbol,
                bid_px,
                offer_px,
            } => {
                info!(symbol = %symbol, %bid_px, %offer_px, "quote accepted");
                Ok(Outcome::QuoteAccepted {
                    symbol,
                    bid_px,
                    offer_px,
                })
            }
        }
    }

    /// Net position for one symbol
    pub fn position(&self, symbol: &str) -> i64 {
        self.risk.position(symbol)
    }

    /// Snapshot of every tracked position
    pub fn positions(&self) -> HashMap<String, i64> {
        self.risk.positions()
    }

    pub fn limits(&self) -> &RiskLimits {
        self.risk.limits()
    }
}
