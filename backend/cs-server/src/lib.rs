pub mod error;
pub mod lock;
pub mod logger;

#[cfg(test)]
mod tests;

pub use error::{Result as ServerErrorResult, ServerError};
pub use lock::{LOCK_FILENAME, LockFile, LockInfo};
