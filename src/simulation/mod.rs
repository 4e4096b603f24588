//! Simulation utilities: random group generation.

pub mod generator;
