// src/chat/mod.rs
// Conversation relay: append a user message, invoke the gateway for a
// delayed reply, notify subscribers on each append.
//
// Subscribers are notified directly from the append path (an observer
// registry) instead of polling the store on an interval. Notification
// still fires per append only: an in-place edit to an existing message
// does not notify, preserving the count-based change-detection contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::GatewayError;
use crate::llm::{CompletionRequest, Gateway};
use crate::store::{LocalStore, CONVERSATIONS_KEY};

/// Delay before the assistant reply is generated, mimicking the original
/// deferred-response behavior.
const REPLY_DELAY: Duration = Duration::from_millis(500);

const GREETING: &str = "Hello! I'm your AI coding assistant. How can I help you today?";

const APOLOGY: &str =
    "I apologize, but I encountered an error processing your message. Please try again.";

const SYSTEM_INSTRUCTION: &str = "You are a helpful coding assistant. \
     Provide clear, concise, and accurate answers about code and programming.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub agent_name: String,
    pub metadata: Value,
    pub messages: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
}

type SubscriberFn = Arc<dyn Fn(&Conversation) + Send + Sync>;
type Registry = Mutex<HashMap<String, Vec<(u64, SubscriberFn)>>>;

/// Handle returned by `subscribe`; consuming it halts delivery.
pub struct Subscription {
    conversation_id: String,
    token: u64,
    registry: Arc<Registry>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        let mut registry = self.registry.lock().expect("subscriber registry poisoned");
        if let Some(subscribers) = registry.get_mut(&self.conversation_id) {
            subscribers.retain(|(token, _)| *token != self.token);
        }
    }
}

/// Minimal asynchronous messaging layer over the gateway and the shared
/// local store.
pub struct ConversationRelay {
    store: LocalStore,
    gateway: Arc<Gateway>,
    registry: Arc<Registry>,
    next_token: AtomicU64,
}

impl ConversationRelay {
    pub fn new(store: LocalStore, gateway: Arc<Gateway>) -> Self {
        Self {
            store,
            gateway,
            registry: Arc::new(Mutex::new(HashMap::new())),
            next_token: AtomicU64::new(1),
        }
    }

    /// Create a conversation seeded with one assistant greeting and
    /// persist it.
    pub fn create_conversation(
        &self,
        agent_name: impl Into<String>,
        metadata: Value,
    ) -> Result<Conversation, GatewayError> {
        let conversation = Conversation {
            id: format!("conv_{}", Uuid::new_v4()),
            agent_name: agent_name.into(),
            metadata,
            messages: vec![ChatTurn::assistant(GREETING)],
            created_at: Utc::now(),
        };

        let mut conversations: Vec<Conversation> = self.store.read(CONVERSATIONS_KEY);
        conversations.push(conversation.clone());
        self.store.write(CONVERSATIONS_KEY, &conversations)?;
        Ok(conversation)
    }

    pub fn get_conversation(&self, id: &str) -> Option<Conversation> {
        self.store
            .read::<Conversation>(CONVERSATIONS_KEY)
            .into_iter()
            .find(|c| c.id == id)
    }

    /// Append a message synchronously, then generate the assistant reply
    /// after a fixed delay on a background task. A downstream failure
    /// becomes a user-facing apology instead of propagating; a chat UI has
    /// no good way to surface a raised error mid-stream.
    pub fn add_message(&self, conversation_id: &str, turn: ChatTurn) -> Result<Conversation, GatewayError> {
        let prompt = turn.content.clone();
        let conversation = self.append(conversation_id, turn)?;

        let store = self.store.clone();
        let gateway = Arc::clone(&self.gateway);
        let registry = Arc::clone(&self.registry);
        let id = conversation_id.to_string();

        tokio::spawn(async move {
            sleep(REPLY_DELAY).await;

            let request = CompletionRequest::text(prompt).with_system(SYSTEM_INSTRUCTION);
            let reply = match gateway.complete(&request).await {
                Ok(result) => result.to_message_text(),
                Err(e) => {
                    warn!("assistant reply failed: {}", e);
                    APOLOGY.to_string()
                }
            };

            if let Err(e) = append_and_notify(&store, &registry, &id, ChatTurn::assistant(reply)) {
                warn!("failed to persist assistant reply: {}", e);
            }
        });

        Ok(conversation)
    }

    /// Register an observer for a conversation. The callback fires once
    /// per appended message with the updated conversation.
    pub fn subscribe(
        &self,
        conversation_id: &str,
        callback: impl Fn(&Conversation) + Send + Sync + 'static,
    ) -> Subscription {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let mut registry = self.registry.lock().expect("subscriber registry poisoned");
        registry
            .entry(conversation_id.to_string())
            .or_default()
            .push((token, Arc::new(callback)));

        Subscription {
            conversation_id: conversation_id.to_string(),
            token,
            registry: Arc::clone(&self.registry),
        }
    }

    fn append(&self, conversation_id: &str, turn: ChatTurn) -> Result<Conversation, GatewayError> {
        append_and_notify(&self.store, &self.registry, conversation_id, turn)
    }
}

fn append_and_notify(
    store: &LocalStore,
    registry: &Arc<Registry>,
    conversation_id: &str,
    turn: ChatTurn,
) -> Result<Conversation, GatewayError> {
    let mut conversations: Vec<Conversation> = store.read(CONVERSATIONS_KEY);
    let conversation = conversations
        .iter_mut()
        .find(|c| c.id == conversation_id)
        .ok_or_else(|| GatewayError::NotFound(conversation_id.to_string()))?;

    conversation.messages.push(turn);
    let snapshot = conversation.clone();
    store.write(CONVERSATIONS_KEY, &conversations)?;

    debug!(
        "conversation {} now has {} messages",
        conversation_id,
        snapshot.messages.len()
    );
    notify(registry, &snapshot);
    Ok(snapshot)
}

fn notify(registry: &Arc<Registry>, conversation: &Conversation) {
    // Snapshot the subscriber list before invoking callbacks so a callback
    // can subscribe or unsubscribe without deadlocking.
    let subscribers: Vec<SubscriberFn> = {
        let registry = registry.lock().expect("subscriber registry poisoned");
        registry
            .get(&conversation.id)
            .map(|subs| subs.iter().map(|(_, f)| Arc::clone(f)).collect())
            .unwrap_or_default()
    };

    for subscriber in subscribers {
        subscriber(conversation);
    }
}
