//! Literal scenario: at close minus 5 minutes, open positions {AAPL 10,
//! SQQQ 30} are flattened with two closing market orders; running the same
//! scheduler again 60 seconds later submits zero new orders.

use sigex_eod::EodScheduler;
use sigex_schemas::BrokerPosition;
use sigex_testkit::RecordingBroker;

#[test]
fn flatten_runs_once_and_a_later_tick_in_the_same_window_submits_nothing_new() {
    let close_ts = 100_000;
    let broker = RecordingBroker::with_positions(vec![
        BrokerPosition {
            symbol: "AAPL".to_string(),
            qty: "10.000000".to_string(),
            avg_price: "190.000000".to_string(),
        },
        BrokerPosition {
            symbol: "SQQQ".to_string(),
            qty: "30.000000".to_string(),
            avg_price: "12.000000".to_string(),
        },
    ]);
    let mut scheduler = EodScheduler::new(broker);

    let first_tick = close_ts - 5 * 60;
    let first_attempts = scheduler.run_if_due("2026-08-01", first_tick, close_ts);
    assert_eq!(first_attempts.len(), 2);

    let second_tick = first_tick + 60;
    let second_attempts = scheduler.run_if_due("2026-08-01", second_tick, close_ts);
    assert!(second_attempts.is_empty());
}
