//! # Handler chain
//!
//! Dispatch for incoming messages. [`HandlerChain`] runs handlers in order until one returns
//! Stop or Reply. [`CommandRouter`] is a handler that maps a command name to the handler for it, so a
//! bot is assembled as `router` followed by a fallback text handler.

mod chain;
mod router;

pub use chain::HandlerChain;
pub use router::CommandRouter;
