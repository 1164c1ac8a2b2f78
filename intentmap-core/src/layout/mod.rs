pub mod constants;
pub mod filter;
pub mod intent_flow;
pub mod routing_flow;
pub mod status;

pub use constants::{ColumnCursor, LayoutConstants};
pub use filter::{IntentFlowFilter, RoutingFlowFilter};
pub use intent_flow::build_intent_flow;
pub use routing_flow::{build_routing_flow, ordered_bypass_rules, GLOBAL_GROUP_KEY};
pub use status::IntentStatus;
