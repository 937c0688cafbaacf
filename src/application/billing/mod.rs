//! Tariff resolution and charge calculation

pub mod calculator;
pub mod resolver;

pub use calculator::charge;
pub use resolver::{ResolverPolicy, TariffMatching, TariffResolver, TieBreak};
