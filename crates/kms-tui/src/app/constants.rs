//! Application constants.

/// Number of rows to move when pressing Page Up/Down.
pub const PAGE_SIZE: usize = 10;

/// Channel buffer size for listing responses.
pub const MESSAGE_CHANNEL_SIZE: usize = 100;

/// Event loop tick interval in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 50;
