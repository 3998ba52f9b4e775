//! Chat client: conversation state, local persistence, relay access and
//! terminal rendering.
pub mod conversation;
pub mod relay_api;
pub mod render;
pub mod session;
pub mod storage;

pub use conversation::{Conversation, Message, Sender};
pub use relay_api::{HttpRelayClient, RelayApi, RelayClientError};
pub use session::{ChatSession, Submission};
pub use storage::{ConversationStore, FileStore, MemoryStore};
