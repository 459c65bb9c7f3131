use sigex_basket::{BasketAggregator, BasketConfig, SEMIS};

/// Long candidates bypass the aggregator and trade their own ticker
/// directly — this crate should never see one. `ingest_short_candidate`
/// must reject a positive-score candidate as a no-op rather than polluting
/// the basket's window.
#[test]
fn a_long_candidate_passed_in_by_mistake_does_not_build_up_the_window() {
    let mut agg = BasketAggregator::new();
    let cfg = BasketConfig::default();

    agg.ingest_short_candidate(&SEMIS, "NVDA", 0.8, 1000, &cfg);
    agg.ingest_short_candidate(&SEMIS, "AMD", 0.6, 1000, &cfg);
    agg.ingest_short_candidate(&SEMIS, "INTC", 0.7, 1000, &cfg);

    assert!(!agg.tick(&SEMIS, &cfg, 1000, false));
}
