pub mod chat;
pub mod transport;

pub use chat::{ActionOutcome, ChatMessage, ChatRole, TestSession};
pub use transport::{TestReply, TestRequest, TestTransport};
