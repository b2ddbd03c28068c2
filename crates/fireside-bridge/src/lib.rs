//! Fireside Bridge — asynchronous request/response bridge to dice-engine bots.
//!
//! A client-facing caller asks for character-card data; the bot that owns the
//! data is reachable only through a previously-established, long-lived duplex
//! connection. This crate correlates each outbound request with the bot's
//! eventual reply and hands that reply back to the original (blocked) caller:
//!
//! 1. the [`locator::ConnectionLocator`] picks a live connection for the
//!    target channel (or any bot connection for unscoped operations),
//! 2. the [`forwarder::RequestForwarder`] registers a fresh correlation token
//!    in the [`registry::PendingRegistry`], sends a framed request and waits,
//! 3. the [`dispatcher::FrameDispatcher`], fed by every connection's read
//!    loop, classifies inbound frames and completes the matching entry,
//! 4. whichever of delivery and timeout fires first decides the outcome; the
//!    loser is a safe no-op.

pub mod connection;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod forwarder;
pub mod locator;
pub mod registry;
pub mod token;
