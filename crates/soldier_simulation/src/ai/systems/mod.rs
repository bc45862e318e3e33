//! AI systems (decision layer)

pub mod actions;
pub mod reactions;
pub mod transitions;

// Re-export all systems
pub use actions::*;
pub use reactions::*;
pub use transitions::*;
