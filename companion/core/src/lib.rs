//! Companion Core - Headless Interaction Engine for the No Help Desk widget
//!
//! This crate provides the conversation and timing logic for a simulated
//! companion character (Rusty, a scrap-metal desk robot who never actually
//! helps), completely independent of any UI framework. It can drive a web
//! widget, a TUI, or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        UI Surfaces                           │
//! │      ┌─────────┐      ┌─────────┐      ┌──────────────┐      │
//! │      │   Web   │      │   TUI   │      │   Headless   │      │
//! │      └────┬────┘      └────┬────┘      └──────┬───────┘      │
//! │           └────────────────┴──────────────────┘              │
//! │                            │                                 │
//! │                    SurfaceEvent (up)                         │
//! │                  CompanionMessage (down)                     │
//! └────────────────────────────┼─────────────────────────────────┘
//!                              │
//! ┌────────────────────────────┼─────────────────────────────────┐
//! │                        COMPANION CORE                        │
//! │  ┌─────────────────────────┴─────────────────────────────┐   │
//! │  │                      Companion                        │   │
//! │  │  ┌──────────────┐  ┌────────────┐  ┌──────────────┐   │   │
//! │  │  │ Conversation │  │ Escalation │  │ ReplySource  │   │   │
//! │  │  │     Log      │  │   State    │  │   (remote)   │   │   │
//! │  │  └──────────────┘  └────────────┘  └──────────────┘   │   │
//! │  └───────────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Behavior
//!
//! Typed submissions go through a delayed response cycle: the companion
//! "reads" for 800 ms, "types" until 3800 ms after submission, then answers
//! with whatever the remote endpoint returns (or a fallback). Direct clicks
//! on the character answer synchronously from a canned [`bank::ResponseBank`]
//! and escalate: eight tolerated pokes, a warning on the ninth, and on the
//! tenth the companion says goodbye and leaves for good.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use companion_core::{
//!     Companion, CompanionConfig, HttpReplyClient, ResponseBank, SurfaceEvent,
//! };
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (msg_tx, mut msg_rx) = mpsc::channel(100);
//!     let (event_tx, event_rx) = mpsc::channel(100);
//!
//!     let config = CompanionConfig::default();
//!     let client = Arc::new(HttpReplyClient::from_config(&config));
//!     let companion = Companion::new(config, client, ResponseBank::builtin(), msg_tx);
//!     tokio::spawn(companion.run(event_rx));
//!
//!     event_tx
//!         .send(SurfaceEvent::MessageSubmitted { text: "help?".into() })
//!         .await
//!         .unwrap();
//!     while let Some(msg) = msg_rx.recv().await {
//!         // Render the message / typing indicator / phase change
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: remote reply contract and its HTTP implementation
//! - [`bank`]: canned-reply asset loading
//! - [`companion`]: the `Companion` controller
//! - [`config`]: engine configuration
//! - [`conversation`]: the append-only conversation log
//! - [`escalation`]: the click escalation state machine
//! - [`events`]: events from UI surfaces to the engine
//! - [`messages`]: messages from the engine to UI surfaces
//! - [`scheduler`]: response-cycle timing and deferred transitions
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on any rendering framework. Layout,
//! styling, the character art, and the exit animation all belong to the
//! embedding surface.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod bank;
pub mod companion;
pub mod config;
pub mod conversation;
pub mod escalation;
pub mod events;
pub mod messages;
pub mod scheduler;

// Re-exports for convenience
pub use backend::{
    HttpReplyClient, ReplyError, ReplySource, DEFAULT_ENDPOINT, MISSING_REASON_FALLBACK,
};
pub use bank::{BankEntry, BankError, ResponseBank};
pub use companion::Companion;
pub use config::CompanionConfig;
pub use conversation::{ChatMessage, ConversationLog, ConversationState};
pub use escalation::{
    ClickOutcome, EscalationPhase, EscalationState, FAREWELL_TEXT, WARNING_TEXT,
};
pub use events::SurfaceEvent;
pub use messages::{CompanionMessage, MessageId, MessageRole};
pub use scheduler::{
    CycleId, CycleUpdate, ResponseCycle, FAILURE_FALLBACK, LEAVE_DELAY, READ_DELAY, REPLY_DELAY,
};
