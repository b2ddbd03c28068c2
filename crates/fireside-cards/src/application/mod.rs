//! Application services orchestrating validate → load → mutate → persist.

pub mod binding_service;
pub mod template_service;
