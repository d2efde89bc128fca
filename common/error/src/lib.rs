//! Shared error machinery for the kernel workspace.
//!
//! Every crate defines its own `snafu`-based error enum under
//! `#[stack_trace_debug]` and implements [`ErrorExt`] so callers can map any
//! error to a [`StatusCode`] without downcasting.

mod ext;
mod status_code;

pub use ext::ErrorExt;
pub use ext::PlainError;
pub use ext::boxed;
pub use status_code::StatusCategory;
pub use status_code::StatusCode;
pub use talon_stack_trace_macro::stack_trace_debug;

/// Location of an error's origin, as captured by `#[snafu(implicit)]`.
pub type Location = snafu::Location;
