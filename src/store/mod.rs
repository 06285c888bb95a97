//! Storage and token collaborators, with in-memory implementations.

pub mod auth;
pub mod games;

pub use auth::{AuthStore, MemoryAuthStore};
pub use games::{GameStore, MemoryGameStore};
