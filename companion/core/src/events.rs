//! Surface Events
//!
//! Events sent from UI surfaces to the engine. Surfaces are "dumb" renderers
//! that forward user actions without interpreting them - the engine decides
//! how to respond.

use serde::{Deserialize, Serialize};

/// Events from a UI surface to the engine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// User submitted a message through the input field
    ///
    /// Blank or whitespace-only text is rejected by the engine with no
    /// visible effect.
    MessageSubmitted {
        /// The raw input text
        text: String,
    },

    /// User clicked/tapped the companion character directly
    CompanionClicked,
}
