//! Built-in suggestion providers.

mod http;
mod pattern_bank;

pub use http::{HttpProvider, HttpProviderConfig};
pub use pattern_bank::PatternBankProvider;
