//! Response Cycle Scheduling
//!
//! Each accepted user submission runs an independent response cycle: after a
//! "reading" delay the typing indicator shows, after the full reply delay the
//! remote source is consulted, and the resolved text is appended whenever the
//! call settles. Cycles are fire-and-forget - nothing cancels one and nothing
//! serializes overlapping ones.
//!
//! Spawned tasks never touch engine state. They only sleep, make the one
//! network attempt, and send [`CycleUpdate`] values back to the controller,
//! which applies every mutation itself.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::backend::ReplySource;
use crate::config::CompanionConfig;

/// Delay from submission until the typing indicator shows ("reading")
pub const READ_DELAY: Duration = Duration::from_millis(800);

/// Delay from submission until the reply call starts ("typing")
pub const REPLY_DELAY: Duration = Duration::from_millis(3800);

/// Delay from the farewell until the companion is gone, matching the
/// exit-animation duration owned by the presentation layer
pub const LEAVE_DELAY: Duration = Duration::from_millis(1000);

/// Reply used when the remote call fails (fetch or decode)
pub const FAILURE_FALLBACK: &str = "Sorry, I couldn't respond right now.";

/// Response cycle identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CycleId(pub u64);

impl CycleId {
    /// Generate a new unique cycle ID
    #[must_use]
    pub fn next() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

/// A pending response cycle, represented as a value so in-flight work is
/// inspectable
#[derive(Clone, Copy, Debug)]
pub struct ResponseCycle {
    /// Cycle identifier
    pub id: CycleId,
    /// When the submission was accepted
    pub submitted_at: Instant,
}

impl ResponseCycle {
    /// Start tracking a cycle for a submission accepted now
    #[must_use]
    pub fn begin() -> Self {
        Self {
            id: CycleId::next(),
            submitted_at: Instant::now(),
        }
    }
}

/// Deferred transitions re-entering the controller
#[derive(Clone, Debug)]
pub enum CycleUpdate {
    /// The cycle's reading delay elapsed; show the typing indicator
    TypingStarted {
        /// The cycle whose delay elapsed
        cycle: CycleId,
    },
    /// The cycle's reply call settled (reply text or fallback)
    Resolved {
        /// The cycle that settled
        cycle: CycleId,
        /// The assistant text to append
        text: String,
    },
    /// The exit animation finished; the companion is gone
    Departed,
}

/// Spawn the timer/network task for one response cycle
///
/// The typing-indicator update is sent strictly before the reply call is
/// made, so within a cycle the indicator always precedes the reply.
pub(crate) fn spawn_cycle(
    cycle: ResponseCycle,
    config: &CompanionConfig,
    source: Arc<dyn ReplySource>,
    updates: mpsc::Sender<CycleUpdate>,
) {
    let read_delay = config.read_delay;
    let typing_delay = config.reply_delay.saturating_sub(config.read_delay);

    tokio::spawn(async move {
        tokio::time::sleep(read_delay).await;
        if updates
            .send(CycleUpdate::TypingStarted { cycle: cycle.id })
            .await
            .is_err()
        {
            return;
        }

        tokio::time::sleep(typing_delay).await;
        let text = match source.generate_reply().await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(
                    cycle = cycle.id.0,
                    source = source.name(),
                    kind = err.kind(),
                    error = %err,
                    "reply request failed, substituting fallback"
                );
                FAILURE_FALLBACK.to_string()
            }
        };

        let _ = updates
            .send(CycleUpdate::Resolved {
                cycle: cycle.id,
                text,
            })
            .await;
    });
}

/// Spawn the deferred `Leaving -> Left` transition
pub(crate) fn spawn_departure(delay: Duration, updates: mpsc::Sender<CycleUpdate>) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = updates.send(CycleUpdate::Departed).await;
    });
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::backend::ReplyError;

    struct FixedSource(Result<String, ReplyError>);

    #[async_trait]
    impl ReplySource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate_reply(&self) -> Result<String, ReplyError> {
            self.0.clone()
        }
    }

    #[test]
    fn test_cycle_ids_unique() {
        assert_ne!(CycleId::next(), CycleId::next());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_shows_typing_then_resolves_on_schedule() {
        let (tx, mut rx) = mpsc::channel(8);
        let start = Instant::now();
        let cycle = ResponseCycle::begin();

        spawn_cycle(
            cycle,
            &CompanionConfig::default(),
            Arc::new(FixedSource(Ok("No.".to_string()))),
            tx,
        );

        match rx.recv().await.unwrap() {
            CycleUpdate::TypingStarted { cycle: id } => assert_eq!(id, cycle.id),
            other => panic!("expected TypingStarted, got {other:?}"),
        }
        assert_eq!(start.elapsed(), Duration::from_millis(800));

        match rx.recv().await.unwrap() {
            CycleUpdate::Resolved { cycle: id, text } => {
                assert_eq!(id, cycle.id);
                assert_eq!(text, "No.");
            }
            other => panic!("expected Resolved, got {other:?}"),
        }
        assert_eq!(start.elapsed(), Duration::from_millis(3800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_call_resolves_with_fallback() {
        let (tx, mut rx) = mpsc::channel(8);
        let cycle = ResponseCycle::begin();

        spawn_cycle(
            cycle,
            &CompanionConfig::default(),
            Arc::new(FixedSource(Err(ReplyError::Fetch("refused".into())))),
            tx,
        );

        // Skip the typing update
        rx.recv().await.unwrap();
        match rx.recv().await.unwrap() {
            CycleUpdate::Resolved { text, .. } => assert_eq!(text, FAILURE_FALLBACK),
            other => panic!("expected Resolved, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_departure_fires_after_the_delay() {
        let (tx, mut rx) = mpsc::channel(8);
        let start = Instant::now();

        spawn_departure(LEAVE_DELAY, tx);

        assert!(matches!(rx.recv().await.unwrap(), CycleUpdate::Departed));
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }
}
