//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error, and a transaction the protocol rejected
/// - 2: Misuse of the command (missing caller, bad config, unusable arguments)
pub mod exit_codes {
    /// Operation rejected by the protocol, or store failure.
    pub const FAILURE: i32 = 1;

    /// Missing caller, bad config, unusable arguments.
    pub const USAGE: i32 = 2;
}
