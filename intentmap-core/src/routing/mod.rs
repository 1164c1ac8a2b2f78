pub mod bypass;

pub use bypass::{evaluate_bypass, rule_matches, BypassMatch, InboundMessage};
