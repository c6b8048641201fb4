//! Tracing/logging setup shared by the binaries.

pub mod logging;

pub use logging::LogFormat;

/// Initialize process-wide logging, format taken from `STOCKROOM_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    logging::init(LogFormat::from_env());
}
