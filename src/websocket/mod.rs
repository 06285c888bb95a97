pub mod game_handlers;
pub mod handler;

pub use game_handlers::GameCommandHandler;
pub use handler::{ws_index, ActorHandle, ChessWebSocket};
