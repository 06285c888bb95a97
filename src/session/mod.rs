pub mod locks;
pub mod registry;

pub use locks::GameLocks;
pub use registry::{ClientHandle, Connection, SessionRegistry};
