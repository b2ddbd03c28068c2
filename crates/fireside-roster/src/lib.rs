//! Fireside Roster — who is in which channel, and which accounts are bots.
//!
//! Backs the bridge's routing policy with an in-memory directory (lookups
//! never touch storage) and keeps bot user profiles aligned with their token
//! metadata.

pub mod directory;
pub mod profile;
