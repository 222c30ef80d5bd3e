//! Logging macros that call tracing underneath, switched off per level by crate features.
//!
//! Pulled in with `#[macro_use]`, so every module declared after this one can call them.

macro_rules! info {
    ($($t:tt)*) => {
        if cfg!(feature = "log_info") {
            ::tracing::info!($($t)*);
        }
    };
}

macro_rules! warn {
    ($($t:tt)*) => {
        if cfg!(feature = "log_warnings") {
            ::tracing::warn!($($t)*);
        }
    };
}

macro_rules! debug {
    ($($t:tt)*) => {
        if cfg!(feature = "log_debug") {
            ::tracing::debug!($($t)*);
        }
    };
}
