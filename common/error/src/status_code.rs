//! Unified status codes for error classification.
//!
//! Status code format: XX_YYY (5-digit)
//! - XX = category (00-09)
//! - YYY = code within category (000-999)

use strum::AsRefStr;
use strum::EnumIter;

/// Status code category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// Success (00_xxx)
    Success,
    /// Common/internal errors (01_xxx)
    Common,
    /// Parameter/validation errors (02_xxx)
    Input,
    /// IO/storage errors (03_xxx)
    Io,
    /// Network/transport errors (04_xxx)
    Network,
    /// Configuration errors (10_xxx)
    Config,
    /// Orchestration-specific errors (11_xxx): hooks, plugins, providers
    Orchestration,
}

macro_rules! define_status_codes {
    ($(
        $(#[$attr:meta])*
        $name:ident = $value:expr => { retryable: $retry:expr, category: $cat:ident $(,)? }
    ),* $(,)?) => {
        /// Status codes for error classification.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter)]
        #[repr(i32)]
        pub enum StatusCode {
            $($(#[$attr])* $name = $value,)*
        }

        impl StatusCode {
            /// Whether an error carrying this status is safe to retry.
            pub fn is_retryable(self) -> bool {
                match self {
                    $(Self::$name => $retry,)*
                }
            }

            /// The broad category this status falls into.
            pub fn category(self) -> StatusCategory {
                match self {
                    $(Self::$name => StatusCategory::$cat,)*
                }
            }
        }
    };
}

define_status_codes! {
    Success = 0 => { retryable: false, category: Success },
    Internal = 1001 => { retryable: false, category: Common },
    InvalidArguments = 2001 => { retryable: false, category: Input },
    NotFound = 2002 => { retryable: false, category: Input },
    IoError = 3001 => { retryable: false, category: Io },
    NetworkError = 4001 => { retryable: true, category: Network },
    Timeout = 4002 => { retryable: true, category: Network },
    InvalidConfig = 10001 => { retryable: false, category: Config },
    HookBlocked = 11001 => { retryable: false, category: Orchestration },
    ProviderFailure = 11002 => { retryable: true, category: Orchestration },
    PluginError = 11003 => { retryable: false, category: Orchestration },
}

#[cfg(test)]
#[path = "status_code.test.rs"]
mod tests;
