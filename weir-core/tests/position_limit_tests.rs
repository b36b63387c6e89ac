//! Position accounting across sequences of orders
//!
//! Exercises the inclusive limit boundaries through the full pipeline and
//! verifies that symbols never cross-contaminate each other's book.

use std::sync::Arc;
use weir_core::journal::MemoryRecorder;
use weir_core::{Outcome, Pipeline, RiskLimits, RiskRejection};

fn pipeline(max_order_size: u64, max_position: i64) -> Pipeline {
    Pipeline::new(
        RiskLimits {
            max_order_size,
            max_position,
        },
        Arc::new(MemoryRecorder::new()),
    )
}

fn buy(symbol: &str, qty: u64) -> String {
    format!("35=D|55={}|54=1|38={}|40=1", symbol, qty)
}

fn sell(symbol: &str, qty: u64) -> String {
    format!("35=D|55={}|54=2|38={}|40=1", symbol, qty)
}

#[test]
fn test_order_size_boundary() {
    let p = pipeline(1_000, 100_000);

    // q == max_order_size approved
    assert!(p.process(&buy("AAPL", 1_000)).unwrap().is_filled());

    // q == max_order_size + 1 rejected
    match p.process(&buy("AAPL", 1_001)).unwrap() {
        Outcome::Rejected { reason, .. } => {
            assert!(matches!(reason, RiskRejection::OrderSizeExceeded { .. }));
        }
        other => panic!("expected Rejected, got {:?}", other),
    }

    assert_eq!(p.position("AAPL"), 1_000);
}

#[test]
fn test_position_boundary_long() {
    let p = pipeline(1_000, 2_000);

    assert!(p.process(&buy("AAPL", 1_000)).unwrap().is_filled());
    assert!(p.process(&buy("AAPL", 1_000)).unwrap().is_filled());
    assert_eq!(p.position("AAPL"), 2_000);

    // One more share would breach the cap
    match p.process(&buy("AAPL", 1)).unwrap() {
        Outcome::Rejected { reason, .. } => match reason {
            RiskRejection::PositionLimitExceeded {
                current,
                prospective,
                limit,
                ..
            } => {
                assert_eq!(current, 2_000);
                assert_eq!(prospective, 2_001);
                assert_eq!(limit, 2_000);
            }
            other => panic!("expected PositionLimitExceeded, got {:?}", other),
        },
        other => panic!("expected Rejected, got {:?}", other),
    }
    assert_eq!(p.position("AAPL"), 2_000);

    // Selling still works from the cap
    assert!(p.process(&sell("AAPL", 500)).unwrap().is_filled());
    assert_eq!(p.position("AAPL"), 1_500);
}

#[test]
fn test_position_boundary_short_is_symmetric() {
    let p = pipeline(1_000, 2_000);

    assert!(p.process(&sell("AAPL", 1_000)).unwrap().is_filled());
    assert!(p.process(&sell("AAPL", 1_000)).unwrap().is_filled());
    assert_eq!(p.position("AAPL"), -2_000);

    match p.process(&sell("AAPL", 1)).unwrap() {
        Outcome::Rejected { reason, .. } => {
            assert!(matches!(reason, RiskRejection::PositionLimitExceeded { .. }));
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
    assert_eq!(p.position("AAPL"), -2_000);
}

#[test]
fn test_position_equals_signed_sum_of_fills() {
    let p = pipeline(1_000, 10_000);

    let script: [(&str, u64, bool); 6] = [
        ("buy", 500, true),
        ("buy", 300, true),
        ("sell", 200, true),
        ("sell", 1_000, true),
        ("buy", 700, true),
        ("sell", 100, true),
    ];

    let mut expected = 0i64;
    for (side, qty, should_fill) in script {
        let raw = if side == "buy" {
            buy("AAPL", qty)
        } else {
            sell("AAPL", qty)
        };
        let outcome = p.process(&raw).unwrap();
        assert_eq!(outcome.is_filled(), should_fill);
        if outcome.is_filled() {
            expected += if side == "buy" { qty as i64 } else { -(qty as i64) };
        }
    }

    assert_eq!(expected, 200);
    assert_eq!(p.position("AAPL"), expected);
}

#[test]
fn test_interleaved_symbols_do_not_cross_contaminate() {
    let p = pipeline(1_000, 2_000);

    assert!(p.process(&buy("AAPL", 1_000)).unwrap().is_filled());
    assert!(p.process(&sell("GOOGL", 600)).unwrap().is_filled());
    assert!(p.process(&buy("AAPL", 1_000)).unwrap().is_filled());
    assert!(p.process(&sell("GOOGL", 600)).unwrap().is_filled());

    // AAPL is at its cap; GOOGL's book must not be affected by that
    assert!(!p.process(&buy("AAPL", 1)).unwrap().is_filled());
    assert!(p.process(&sell("GOOGL", 800)).unwrap().is_filled());

    assert_eq!(p.position("AAPL"), 2_000);
    assert_eq!(p.position("GOOGL"), -2_000);

    let positions = p.positions();
    assert_eq!(positions.len(), 2);
}

#[test]
fn test_rejected_symbol_still_lazily_tracked_at_zero() {
    let p = pipeline(1_000, 2_000);

    // Order-size rejection happens before the book is consulted
    assert!(!p.process(&buy("MSFT", 5_000)).unwrap().is_filled());
    assert_eq!(p.position("MSFT"), 0);
    assert!(p.positions().is_empty());
}
