// src/lib.rs

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod store;

pub use chat::{ChatTurn, Conversation, ConversationRelay, Role, Subscription};
pub use config::{GatewayConfig, ProviderConfig};
pub use error::GatewayError;
pub use llm::{CompletionRequest, CompletionResult, Gateway};
pub use store::{FileStore, LocalStore, StoredFile};
