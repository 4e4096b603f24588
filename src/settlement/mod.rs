//! Settlement: payments, the greedy optimizer, plans, records and the
//! whole-group pipeline.

pub mod group;
pub mod optimizer;
pub mod payment;
pub mod plan;
pub mod record;
