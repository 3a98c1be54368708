//! Companion - The Interaction Core
//!
//! The `Companion` is the single owner of all conversation state: the
//! append-only log, the typing indicator, and the escalation phase. It is
//! UI-agnostic - it doesn't know or care whether it's talking to a web
//! widget, a TUI, or a test harness. It communicates through:
//!
//! - [`CompanionMessage`]: notifications sent TO the UI surface
//! - [`SurfaceEvent`]: events received FROM the UI surface
//!
//! # Concurrency
//!
//! Cooperative single-owner scheduling. Spawned cycle and departure tasks
//! never touch state; they send [`CycleUpdate`] values over an internal
//! channel and the `Companion` applies every mutation itself, so no locking
//! is needed anywhere. Between awaits each step runs to completion.
//!
//! Two consequences of the fire-and-forget cycle design are part of the
//! companion's observable behavior and are kept on purpose:
//!
//! - the typing indicator is one shared flag, so overlapping cycles can
//!   flicker it falsely off and on again;
//! - replies can append out of submission order when a later cycle's call
//!   settles first.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::mpsc;

use crate::backend::ReplySource;
use crate::bank::ResponseBank;
use crate::config::CompanionConfig;
use crate::conversation::{ConversationLog, ConversationState};
use crate::escalation::{
    ClickOutcome, EscalationPhase, EscalationState, FAREWELL_TEXT, WARNING_TEXT,
};
use crate::events::SurfaceEvent;
use crate::messages::{CompanionMessage, MessageId};
use crate::scheduler::{self, CycleUpdate, ResponseCycle};

/// Capacity of the internal deferred-transition channel
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// The companion interaction engine
pub struct Companion {
    /// Configuration
    config: CompanionConfig,
    /// Remote reply collaborator
    reply_source: Arc<dyn ReplySource>,
    /// Canned replies for clicks
    bank: ResponseBank,
    /// Conversation log and shared typing indicator flag
    conversation: ConversationState,
    /// Click escalation state
    escalation: EscalationState,
    /// Randomness source for bank selection
    rng: Box<dyn RngCore + Send>,
    /// Cycles submitted but not yet resolved
    pending: Vec<ResponseCycle>,
    /// Channel to notify the UI surface
    tx: mpsc::Sender<CompanionMessage>,
    /// Deferred transitions re-entering the controller
    update_tx: mpsc::Sender<CycleUpdate>,
    update_rx: mpsc::Receiver<CycleUpdate>,
}

impl Companion {
    /// Create a new engine
    ///
    /// `tx` is the surface notification channel; sends to it are
    /// best-effort, a slow or disconnected surface never blocks the engine.
    pub fn new(
        config: CompanionConfig,
        reply_source: Arc<dyn ReplySource>,
        bank: ResponseBank,
        tx: mpsc::Sender<CompanionMessage>,
    ) -> Self {
        debug_assert!(
            config.reply_delay > config.read_delay,
            "the typing indicator must precede the reply"
        );
        let (update_tx, update_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            config,
            reply_source,
            bank,
            conversation: ConversationState::new(),
            escalation: EscalationState::new(),
            rng: Box::new(StdRng::from_entropy()),
            pending: Vec::new(),
            tx,
            update_tx,
            update_rx,
        }
    }

    /// Replace the randomness source (reproducible bank selection in tests)
    #[must_use]
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// The conversation state (log and typing indicator)
    #[must_use]
    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    /// The conversation log
    #[must_use]
    pub fn log(&self) -> &ConversationLog {
        &self.conversation.log
    }

    /// Whether the typing indicator is currently shown
    #[must_use]
    pub fn typing_indicator_visible(&self) -> bool {
        self.conversation.typing_indicator_visible
    }

    /// Current escalation phase
    #[must_use]
    pub fn phase(&self) -> EscalationPhase {
        self.escalation.phase()
    }

    /// Cumulative accepted clicks
    #[must_use]
    pub fn clicks(&self) -> u32 {
        self.escalation.clicks()
    }

    /// Cycles submitted but not yet resolved
    #[must_use]
    pub fn pending_cycles(&self) -> &[ResponseCycle] {
        &self.pending
    }

    /// Handle an event from the UI surface
    ///
    /// Must be called from within a Tokio runtime: accepted submissions and
    /// the farewell spawn timer tasks.
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::MessageSubmitted { text } => self.handle_submission(text),
            SurfaceEvent::CompanionClicked => self.handle_click(),
        }
    }

    /// Await and apply the next deferred transition
    ///
    /// Returns `false` once no update can ever arrive again (all senders
    /// dropped). Embedders normally use [`Companion::run`] instead; this is
    /// the granular entry point for headless driving.
    pub async fn apply_next_update(&mut self) -> bool {
        match self.update_rx.recv().await {
            Some(update) => {
                self.apply_update(update);
                true
            }
            None => false,
        }
    }

    /// Drive the engine until the surface event channel closes
    pub async fn run(mut self, mut events: mpsc::Receiver<SurfaceEvent>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
                Some(update) = self.update_rx.recv() => self.apply_update(update),
            }
        }
    }

    fn handle_submission(&mut self, text: String) {
        // Blank input: no message, no cycle, no side effects.
        let Some(id) = self.conversation.log.append_user(text) else {
            return;
        };
        self.notify_appended(id);

        // Captured once, at submission time. A submission made while the
        // companion is gone is logged but never answered; a cycle already in
        // flight when the phase reaches Left still completes.
        if self.escalation.phase().is_left() {
            tracing::debug!("companion has left; submission gets no reply");
            return;
        }

        let cycle = ResponseCycle::begin();
        tracing::debug!(cycle = cycle.id.0, "starting response cycle");
        self.pending.push(cycle);
        scheduler::spawn_cycle(
            cycle,
            &self.config,
            Arc::clone(&self.reply_source),
            self.update_tx.clone(),
        );
    }

    fn handle_click(&mut self) {
        match self.escalation.register_click(&mut self.rng, &self.bank) {
            ClickOutcome::Ignored => {}
            ClickOutcome::BankReply { text } => {
                let id = self.conversation.log.append_assistant(text);
                self.notify_appended(id);
            }
            ClickOutcome::Warning => {
                let id = self.conversation.log.append_assistant(WARNING_TEXT);
                self.notify_appended(id);
                self.notify_phase();
            }
            ClickOutcome::Farewell => {
                let id = self.conversation.log.append_assistant(FAREWELL_TEXT);
                self.notify_appended(id);
                self.notify_phase();
                scheduler::spawn_departure(self.config.leave_delay, self.update_tx.clone());
            }
        }
    }

    fn apply_update(&mut self, update: CycleUpdate) {
        match update {
            CycleUpdate::TypingStarted { cycle } => {
                tracing::debug!(cycle = cycle.0, "showing typing indicator");
                self.set_typing(true);
            }
            CycleUpdate::Resolved { cycle, text } => {
                tracing::debug!(cycle = cycle.0, "response cycle resolved");
                self.pending.retain(|pending| pending.id != cycle);
                let id = self.conversation.log.append_assistant(text);
                self.notify_appended(id);
                // Cleared unconditionally, success or fallback - and shared
                // across cycles, hence the documented flicker.
                self.set_typing(false);
            }
            CycleUpdate::Departed => {
                self.escalation.complete_departure();
                self.notify_phase();
            }
        }
    }

    fn set_typing(&mut self, visible: bool) {
        self.conversation.typing_indicator_visible = visible;
        self.notify(CompanionMessage::TypingIndicator { visible });
    }

    fn notify_appended(&self, id: MessageId) {
        if let Some(msg) = self.conversation.log.messages().iter().rev().find(|m| m.id == id) {
            self.notify(CompanionMessage::Message {
                id: msg.id,
                role: msg.role,
                text: msg.text.clone(),
            });
        }
    }

    fn notify_phase(&self) {
        self.notify(CompanionMessage::PhaseChanged {
            phase: self.escalation.phase(),
        });
    }

    fn notify(&self, message: CompanionMessage) {
        if let Err(err) = self.tx.try_send(message) {
            tracing::debug!(error = %err, "dropping surface notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::backend::ReplyError;
    use crate::MessageRole;

    struct NeverCalled;

    #[async_trait::async_trait]
    impl ReplySource for NeverCalled {
        fn name(&self) -> &str {
            "never"
        }

        async fn generate_reply(&self) -> Result<String, ReplyError> {
            panic!("reply source should not be consulted");
        }
    }

    fn companion() -> (Companion, mpsc::Receiver<CompanionMessage>) {
        let (tx, rx) = mpsc::channel(64);
        let companion = Companion::new(
            CompanionConfig::default(),
            Arc::new(NeverCalled),
            ResponseBank::builtin(),
            tx,
        )
        .with_rng(StdRng::seed_from_u64(0));
        (companion, rx)
    }

    #[tokio::test]
    async fn test_blank_submission_has_no_effect() {
        let (mut companion, mut rx) = companion();

        companion.handle_event(SurfaceEvent::MessageSubmitted {
            text: "   \t".to_string(),
        });

        assert!(companion.log().is_empty());
        assert!(companion.pending_cycles().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_click_appends_and_notifies() {
        let (mut companion, mut rx) = companion();

        companion.handle_event(SurfaceEvent::CompanionClicked);

        assert_eq!(companion.log().len(), 1);
        assert_eq!(companion.clicks(), 1);
        let msg = companion.log().last().unwrap();
        assert_eq!(msg.role, MessageRole::Assistant);
        assert!(ResponseBank::builtin().contains(&msg.text));

        match rx.try_recv().unwrap() {
            CompanionMessage::Message { role, text, .. } => {
                assert_eq!(role, MessageRole::Assistant);
                assert_eq!(text, msg.text);
            }
            other => panic!("expected Message, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_warning_click_notifies_phase_change() {
        let (mut companion, mut rx) = companion();

        for _ in 0..9 {
            companion.handle_event(SurfaceEvent::CompanionClicked);
        }
        assert_eq!(companion.phase(), EscalationPhase::Warned);
        assert_eq!(companion.log().last().unwrap().text, WARNING_TEXT);

        let mut saw_phase_change = false;
        while let Ok(msg) = rx.try_recv() {
            if let CompanionMessage::PhaseChanged { phase } = msg {
                assert_eq!(phase, EscalationPhase::Warned);
                saw_phase_change = true;
            }
        }
        assert!(saw_phase_change);
    }

    #[tokio::test]
    async fn test_engine_survives_a_disconnected_surface() {
        let (mut companion, rx) = companion();
        drop(rx);

        companion.handle_event(SurfaceEvent::CompanionClicked);
        assert_eq!(companion.log().len(), 1);
    }
}
