//! Live chess server: a rule engine plus a WebSocket session protocol that
//! lets two players and any number of observers follow one game.

pub mod config;
pub mod error;
pub mod game;
pub mod models;
pub mod routes;
pub mod service;
pub mod session;
pub mod store;
pub mod testing;
pub mod websocket;

pub use error::ServerError;
