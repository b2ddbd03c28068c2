//! Shared test mocks and utilities for the Fireside backend.

mod clock;
mod connection;
mod directory;
mod repository;

pub use clock::FixedClock;
pub use connection::{FailingConnection, RecordingConnection, RecordingHandler};
pub use directory::{OpenMembership, StaticDirectory};
pub use repository::{
    InMemoryBindingRepository, InMemoryTemplateRepository, InMemoryUserRepository,
};
