//! Energy-saving chat assistant for PowerPredict.
//!
//! Provides the static knowledge base, the rule-based advisory engine,
//! the chat session controller, and an optional LLM fallback client.

pub mod advisor;
pub mod assistant;
pub mod error;
pub mod knowledge;
pub mod random;
pub mod session;
pub mod types;

pub use advisor::{potential_savings, respond, validate_query, SAVINGS_RATE};
pub use assistant::{ask_or_apologize, CompletionService, OpenAiAssistant, UNAVAILABLE_MESSAGE};
pub use error::ChatError;
pub use knowledge::{find_topic, pick_response, pick_suggestions, KnowledgeTopic, TOPICS};
pub use random::{FixedRandom, RandomSource, StdRandom};
pub use session::{ChatSession, PendingTurn, SessionState, TurnOrigin};
pub use types::{AdvisoryResponse, ChatMessage, ResponseSource};
