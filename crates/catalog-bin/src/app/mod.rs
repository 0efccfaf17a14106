//! Application wiring: startup, the session and the REPL loop.

mod init;
mod session;

pub use init::run;
use session::{run_repl, Session};

use catalog_config_and_utils::CoreError;
use catalog_engine::CatalogError;

use crate::dispatcher::DispatchError;

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Interactive session on stdin/stdout.
    Repl,
    /// Print the catalog once and exit.
    List,
    /// Print the catalog as JSON and exit.
    Export,
}

/// Errors that end the program.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("invalid initial catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
