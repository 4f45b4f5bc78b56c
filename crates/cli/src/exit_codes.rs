//! Exit codes for `qpad`.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | Runtime failure (unreadable file, store error)  |
//! | 2    | Usage error (bad arguments, malformed spec)     |
//!
//! Scripts depend on these; add new codes rather than repurposing one.

/// Command completed.
pub const EXIT_SUCCESS: u8 = 0;

/// Something failed at runtime.
pub const EXIT_ERROR: u8 = 1;

/// Bad arguments. clap also exits with 2 for parse errors, so the two agree.
pub const EXIT_USAGE: u8 = 2;
