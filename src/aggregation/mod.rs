//! Balance aggregation: expenses and shares in, one net balance per participant out.

pub mod aggregator;
