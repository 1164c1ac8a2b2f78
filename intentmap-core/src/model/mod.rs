pub mod entities;
pub mod snapshot;

pub use entities::{
    Agent, BypassRule, BypassRuleType, Domain, Intent, IntentAgentMapping, KeywordMapping,
};
pub use snapshot::{load_snapshot, Snapshot};
