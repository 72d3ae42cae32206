pub mod error;
pub mod handlers;
pub mod health;
pub mod logger;
pub mod reader;
pub mod routes;
pub mod state;
pub mod watchdog;

#[cfg(test)]
mod tests;

pub use crate::error::{Result as ServerResult, ServerError};
pub use crate::reader::{
    CardReader, LineCardReader, ReaderLoopConfig, ReaderPeripherals, run_reader_loop,
};
pub use crate::routes::build_router;
pub use crate::state::ServerState;
pub use crate::watchdog::run_watchdog_monitor;
