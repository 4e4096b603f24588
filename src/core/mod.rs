//! Foundational types: identifiers, currency, money, expenses, balances, errors.

pub mod balance;
pub mod currency;
pub mod error;
pub mod expense;
pub mod money;
pub mod participant;
