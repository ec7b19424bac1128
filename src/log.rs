//! Utilities for logging messages from the library.
//!
//! Logging is off unless the `PATHKIT_LOG` environment variable is set when the
//! first message is considered.  Messages go to stderr, so they never get mixed
//! up with path data that the command-line tool prints.

use once_cell::sync::Lazy;

static LOG_ENABLED: Lazy<bool> = Lazy::new(|| std::env::var_os("PATHKIT_LOG").is_some());

#[doc(hidden)]
pub fn log_enabled() -> bool {
    *LOG_ENABLED
}

#[doc(hidden)]
#[macro_export]
macro_rules! pathkit_log {
    (
        $($arg:tt)+
    ) => {
        if $crate::log::log_enabled() {
            eprintln!("pathkit: {}", format_args!($($arg)+));
        }
    };
}
