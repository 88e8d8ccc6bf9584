//! Chat session controller.
//!
//! Owns the linear transcript and the open/typing flags. A user turn is split
//! in two: [`ChatSession::begin_turn`] appends the user message and raises the
//! typing flag, [`ChatSession::complete_turn`] appends the single bot reply and
//! lowers it. The async helpers sleep between the two phases.

use std::time::Duration;

use powerpredict_core::config::ChatConfig;
use powerpredict_core::types::{Appliance, BillCalculation};
use tracing::debug;

use crate::advisor::{respond, validate_query};
use crate::error::ChatError;
use crate::random::{RandomSource, StdRandom};
use crate::types::ChatMessage;

/// Opening lines; one is picked at random when the chat first opens.
pub const GREETINGS: [&str; 3] = [
    "Hello! I'm your Energy Assistant. I can help you reduce your electricity bill and optimize your energy usage. What would you like to know?",
    "Hi there! I'm here to help you save energy and money. Ask me anything about your electricity usage!",
    "Welcome! I'm your personal energy advisor. How can I help you lower your power bill today?",
];

/// Quick-start chips. The greeting carries the first [`GREETING_SUGGESTION_COUNT`].
pub const QUICK_SUGGESTIONS: [&str; 6] = [
    "How to reduce my bill?",
    "LED vs incandescent bulbs",
    "Best AC temperature?",
    "Phantom load devices",
    "Energy efficient appliances",
    "Solar panel benefits",
];

pub const GREETING_SUGGESTION_COUNT: usize = 3;

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    /// Open with an empty transcript (greeting not yet delivered).
    OpenEmpty,
    OpenActive,
}

/// How the user produced a message. Decides the reply delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOrigin {
    Typed,
    Suggestion,
}

/// A user turn waiting for its bot reply.
#[derive(Debug)]
pub struct PendingTurn {
    pub query: String,
    pub origin: TurnOrigin,
    /// How long the bot "types" before replying.
    pub delay: Duration,
    seq: u64,
}

/// One chat widget instance.
pub struct ChatSession<R: RandomSource = StdRandom> {
    config: ChatConfig,
    rng: R,
    messages: Vec<ChatMessage>,
    is_open: bool,
    is_typing: bool,
    /// Id of the turn allowed to complete; bumped on every begin and clear.
    turn_seq: u64,
}

impl ChatSession<StdRandom> {
    pub fn new(config: ChatConfig) -> Self {
        Self::with_random(config, StdRandom::new())
    }
}

impl<R: RandomSource> ChatSession<R> {
    /// Session with an injected random source.
    pub fn with_random(config: ChatConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            messages: Vec::new(),
            is_open: false,
            is_typing: false,
            turn_seq: 0,
        }
    }

    // ========================================================================
    // Open / close
    // ========================================================================

    /// Open the chat. Returns the greeting delay when a greeting is due.
    pub fn open(&mut self) -> Option<Duration> {
        if self.is_open {
            return None;
        }
        self.is_open = true;
        debug!("Chat opened");
        if self.messages.is_empty() {
            Some(Duration::from_millis(self.config.greeting_delay_ms))
        } else {
            None
        }
    }

    /// Append the greeting if the chat is open and still empty.
    pub fn deliver_greeting(&mut self) -> Option<&ChatMessage> {
        if !self.is_open || !self.messages.is_empty() {
            return None;
        }
        let greeting = GREETINGS[self.rng.pick_index(GREETINGS.len())];
        let chips = QUICK_SUGGESTIONS
            .iter()
            .take(GREETING_SUGGESTION_COUNT)
            .map(|s| s.to_string())
            .collect();
        Some(self.push(ChatMessage::bot(greeting, Some(chips))))
    }

    /// Hide the chat. The transcript is kept.
    pub fn close(&mut self) {
        self.is_open = false;
        debug!("Chat closed");
    }

    /// Empty the transcript and drop any pending reply.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.is_typing = false;
        self.turn_seq += 1;
    }

    // ========================================================================
    // Turns
    // ========================================================================

    /// Append the user message and start typing.
    ///
    /// Nothing is appended when the chat is closed, busy, or the text is
    /// empty or too long.
    pub fn begin_turn(&mut self, text: &str, origin: TurnOrigin) -> Result<PendingTurn, ChatError> {
        if !self.is_open {
            return Err(ChatError::Closed);
        }
        if self.is_typing {
            return Err(ChatError::Busy);
        }
        let query = validate_query(text, self.config.max_message_length)?.to_string();

        let delay_ms = match origin {
            TurnOrigin::Typed => self
                .rng
                .pick_delay_ms(self.config.typing_delay_min_ms, self.config.typing_delay_max_ms),
            TurnOrigin::Suggestion => self.config.suggestion_delay_ms,
        };

        self.messages.push(ChatMessage::user(query.clone()));
        self.is_typing = true;
        self.turn_seq += 1;
        debug!(?origin, delay_ms, "Turn started");

        Ok(PendingTurn {
            query,
            origin,
            delay: Duration::from_millis(delay_ms),
            seq: self.turn_seq,
        })
    }

    /// Answer a pending turn with the advisory engine.
    ///
    /// Returns `None` when the turn went stale because the chat was cleared.
    pub fn complete_turn(
        &mut self,
        turn: PendingTurn,
        bill: Option<&BillCalculation>,
        appliances: &[Appliance],
    ) -> Option<&ChatMessage> {
        if !self.is_current(&turn) {
            return None;
        }
        Some(self.answer(&turn.query, bill, appliances))
    }

    /// Answer a pending turn with externally produced text.
    pub fn complete_turn_with_reply(
        &mut self,
        turn: PendingTurn,
        text: impl Into<String>,
    ) -> Option<&ChatMessage> {
        if !self.is_current(&turn) {
            return None;
        }
        self.is_typing = false;
        Some(self.push(ChatMessage::bot(text, None)))
    }

    // ========================================================================
    // Async helpers
    // ========================================================================

    /// Open the chat and wait out the greeting delay.
    pub async fn open_and_greet(&mut self) -> Option<&ChatMessage> {
        let delay = self.open()?;
        tokio::time::sleep(delay).await;
        self.deliver_greeting()
    }

    /// Submit a message, wait the typing delay, and return the bot reply.
    ///
    /// Dropping the future before it resolves abandons the turn: the user
    /// message stays in the transcript without a reply and the typing flag
    /// is lowered so the session accepts input again.
    pub async fn send(
        &mut self,
        text: &str,
        origin: TurnOrigin,
        bill: Option<&BillCalculation>,
        appliances: &[Appliance],
    ) -> Result<&ChatMessage, ChatError> {
        let turn = self.begin_turn(text, origin)?;
        let mut reset = AbandonOnDrop {
            session: &mut *self,
            armed: true,
        };
        tokio::time::sleep(turn.delay).await;
        reset.armed = false;
        drop(reset);
        Ok(self.answer(&turn.query, bill, appliances))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn state(&self) -> SessionState {
        match (self.is_open, self.messages.is_empty()) {
            (false, _) => SessionState::Closed,
            (true, true) => SessionState::OpenEmpty,
            (true, false) => SessionState::OpenActive,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn is_current(&self, turn: &PendingTurn) -> bool {
        self.is_typing && turn.seq == self.turn_seq
    }

    fn answer(
        &mut self,
        query: &str,
        bill: Option<&BillCalculation>,
        appliances: &[Appliance],
    ) -> &ChatMessage {
        let response = respond(query, bill, appliances, &mut self.rng);
        self.is_typing = false;
        self.push(ChatMessage::bot(response.text, Some(response.suggestions)))
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}

/// Lowers the typing flag of a turn whose future was dropped mid-delay.
struct AbandonOnDrop<'a, R: RandomSource> {
    session: &'a mut ChatSession<R>,
    armed: bool,
}

impl<R: RandomSource> Drop for AbandonOnDrop<'_, R> {
    fn drop(&mut self) {
        if self.armed {
            debug!("Pending turn abandoned");
            self.session.is_typing = false;
            self.session.turn_seq += 1;
        }
    }
}
