//! Click Escalation State Machine
//!
//! Tracks repeated direct clicks on the companion and drives its lifecycle
//! phase. The companion tolerates eight pokes, warns on the ninth, says
//! goodbye on the tenth, and is gone for good once the exit animation ends.
//!
//! Phase transitions are monotonic: `Present -> Warned -> Leaving -> Left`,
//! never backward. Clicks arriving once the phase has moved past `Warned` are
//! defined no-ops, not errors.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bank::ResponseBank;

/// Number of clicks answered from the response bank before the warning
const WARNING_CLICK: u32 = 9;

/// Click count at which the companion leaves
const FAREWELL_CLICK: u32 = 10;

/// Fixed reply to the ninth click
pub const WARNING_TEXT: &str = "I'm serious. Poke me one more time and I'm leaving.";

/// Fixed reply to the tenth click, sent as the companion departs
pub const FAREWELL_TEXT: &str = "Right. That's it. I'm out of here.";

/// The companion character's lifecycle phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscalationPhase {
    /// On scene, answering clicks from the bank
    #[default]
    Present,
    /// Warned the user after the ninth click
    Warned,
    /// Farewell sent, exit animation playing
    Leaving,
    /// Gone for good
    Left,
}

impl EscalationPhase {
    /// Whether clicks still do anything in this phase
    #[must_use]
    pub fn accepts_clicks(&self) -> bool {
        matches!(self, Self::Present | Self::Warned)
    }

    /// Whether the companion has left the scene permanently
    #[must_use]
    pub fn is_left(&self) -> bool {
        matches!(self, Self::Left)
    }

    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Warned => "warned",
            Self::Leaving => "leaving",
            Self::Left => "left",
        }
    }
}

/// What a click produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Click ignored - the companion is already leaving or gone
    Ignored,
    /// A canned reply selected from the bank
    BankReply {
        /// The selected reply text
        text: String,
    },
    /// The fixed warning; phase moved to `Warned`
    Warning,
    /// The fixed farewell; phase moved to `Leaving` and the caller must
    /// schedule the deferred departure
    Farewell,
}

/// Escalation state: cumulative click count and current phase
///
/// Created once per session at `{0, Present}`. The transition computation is
/// a pure function of the current state and the click; the controller applies
/// the outcome (log append, surface notification, deferred departure).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EscalationState {
    clicks: u32,
    phase: EscalationPhase,
}

impl EscalationState {
    /// Fresh state for a new session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cumulative accepted clicks
    #[must_use]
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> EscalationPhase {
        self.phase
    }

    /// Register a direct click on the companion
    ///
    /// The randomness source is injected so bank selection is reproducible
    /// under test.
    pub fn register_click<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        bank: &ResponseBank,
    ) -> ClickOutcome {
        if !self.phase.accepts_clicks() {
            tracing::debug!(phase = self.phase.description(), "click ignored");
            return ClickOutcome::Ignored;
        }

        self.clicks += 1;
        match self.clicks {
            count if count < WARNING_CLICK => ClickOutcome::BankReply {
                text: bank.pick(rng).to_string(),
            },
            WARNING_CLICK => {
                self.phase = EscalationPhase::Warned;
                tracing::debug!(clicks = self.clicks, "companion warned the user");
                ClickOutcome::Warning
            }
            // FAREWELL_CLICK, reached exactly once: later clicks are
            // rejected above once the phase leaves Present/Warned.
            _ => {
                self.phase = EscalationPhase::Leaving;
                tracing::debug!(clicks = self.clicks, "companion is leaving");
                ClickOutcome::Farewell
            }
        }
    }

    /// Complete the deferred `Leaving -> Left` transition
    ///
    /// No-op from any other phase, so a stray completion can never move the
    /// phase backward.
    pub fn complete_departure(&mut self) {
        if self.phase == EscalationPhase::Leaving {
            self.phase = EscalationPhase::Left;
            tracing::debug!("companion left");
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn bank() -> ResponseBank {
        ResponseBank::from_entries(["one", "two", "three"]).unwrap()
    }

    #[test]
    fn test_first_eight_clicks_reply_from_bank() {
        let mut rng = StdRng::seed_from_u64(42);
        let bank = bank();
        let mut state = EscalationState::new();

        for click in 1..=8 {
            let outcome = state.register_click(&mut rng, &bank);
            match outcome {
                ClickOutcome::BankReply { text } => assert!(bank.contains(&text)),
                other => panic!("click {click}: expected a bank reply, got {other:?}"),
            }
            assert_eq!(state.phase(), EscalationPhase::Present);
            assert_eq!(state.clicks(), click);
        }
    }

    #[test]
    fn test_ninth_click_warns() {
        let mut rng = StdRng::seed_from_u64(42);
        let bank = bank();
        let mut state = EscalationState::new();

        for _ in 0..8 {
            state.register_click(&mut rng, &bank);
        }
        let outcome = state.register_click(&mut rng, &bank);
        assert_eq!(outcome, ClickOutcome::Warning);
        assert_eq!(state.phase(), EscalationPhase::Warned);
    }

    #[test]
    fn test_tenth_click_triggers_departure() {
        let mut rng = StdRng::seed_from_u64(42);
        let bank = bank();
        let mut state = EscalationState::new();

        for _ in 0..9 {
            state.register_click(&mut rng, &bank);
        }
        let outcome = state.register_click(&mut rng, &bank);
        assert_eq!(outcome, ClickOutcome::Farewell);
        assert_eq!(state.phase(), EscalationPhase::Leaving);

        state.complete_departure();
        assert_eq!(state.phase(), EscalationPhase::Left);
    }

    #[test]
    fn test_clicks_ignored_once_leaving() {
        let mut rng = StdRng::seed_from_u64(42);
        let bank = bank();
        let mut state = EscalationState::new();

        for _ in 0..10 {
            state.register_click(&mut rng, &bank);
        }
        assert_eq!(state.clicks(), 10);

        // While leaving
        assert_eq!(
            state.register_click(&mut rng, &bank),
            ClickOutcome::Ignored
        );
        assert_eq!(state.clicks(), 10);
        assert_eq!(state.phase(), EscalationPhase::Leaving);

        // And after leaving
        state.complete_departure();
        assert_eq!(
            state.register_click(&mut rng, &bank),
            ClickOutcome::Ignored
        );
        assert_eq!(state.clicks(), 10);
        assert_eq!(state.phase(), EscalationPhase::Left);
    }

    #[test]
    fn test_departure_only_completes_from_leaving() {
        let mut state = EscalationState::new();

        // Present: a stray completion must not jump the phase forward
        state.complete_departure();
        assert_eq!(state.phase(), EscalationPhase::Present);

        // Left: idempotent
        let mut rng = StdRng::seed_from_u64(42);
        let bank = bank();
        for _ in 0..10 {
            state.register_click(&mut rng, &bank);
        }
        state.complete_departure();
        state.complete_departure();
        assert_eq!(state.phase(), EscalationPhase::Left);
    }

    #[test]
    fn test_selection_is_reproducible_for_a_seed() {
        let bank = bank();

        let run = |seed: u64| -> Vec<String> {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = EscalationState::new();
            (0..8)
                .map(|_| match state.register_click(&mut rng, &bank) {
                    ClickOutcome::BankReply { text } => text,
                    other => panic!("expected a bank reply, got {other:?}"),
                })
                .collect()
        };

        assert_eq!(run(1), run(1));
    }
}
