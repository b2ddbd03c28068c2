//! Fireside Cards — character-card template & binding bounded context.
//!
//! Users keep reusable sheet templates and bind them to the character cards
//! a dice-engine bot manages per channel. Database-backed glue with no
//! concurrency coordination; persistence is reached through the narrow
//! repository traits in [`repository`].

pub mod application;
pub mod domain;
pub mod repository;
