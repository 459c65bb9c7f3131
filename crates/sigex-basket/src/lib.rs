//! sigex-basket
//!
//! Basket aggregator and inverse-ETF routing for short candidates. Grounded
//! on `mqk-execution::gateway::BrokerGateway`'s single-flight lock
//! chokepoint for the ETF-lock acquisition, and
//! `mqk-portfolio::allocator::Allocator`'s validate-then-reject-with-reason
//! style for the fire-condition checks (not its cross-sectional weighting,
//! which has no counterpart here).

mod aggregator;

pub use aggregator::{
    BasketAggregator, BasketConfig, BasketDef, BasketFireEvent, MEGATECH, PREDEFINED_BASKETS, SEMIS,
};
