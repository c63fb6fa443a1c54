// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Debug-logging functionality.
//!
//! This module is still present when the `log` feature is disabled, but all
//! logging operations are redacted. Redaction completely compiles out log
//! statements: not even the format strings remain in the final binary.
//! Arguments are still type-checked, inside a closure that is never called,
//! so that values only ever logged do not trip `unused` lints.
//!
//! Driver code *should not* call into the [`log`] crate directly outside of
//! this module.

use core::fmt;

#[cfg(doc)]
use __raw_log as log;

/// A wrapped driver error.
///
/// This type should always be referred to as `tmu::Error`. It represents an
/// error that has already been logged at the point where it was raised.
/// This type cannot be directly created by users of the library.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Error<E> {
    inner: E,
}

impl<E> Error<E> {
    /// Creates a new `Error`. This function is an implementation detail,
    /// and should not be called by users.
    #[doc(hidden)]
    pub fn __new(inner: E) -> Self {
        Self { inner }
    }

    /// Transforms the wrapper error by way of an [`Into`] conversion.
    pub fn cast<F: From<E>>(self) -> Error<F> {
        Error {
            inner: self.inner.into(),
        }
    }

    /// Gets the wrapped error.
    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<E> AsRef<E> for Error<E> {
    fn as_ref(&self) -> &E {
        &self.inner
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        struct DisplayAsDebug<'a, E>(&'a E);
        impl<E: fmt::Display> fmt::Debug for DisplayAsDebug<'_, E> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        f.debug_struct("tmu::Error")
            .field("inner", &DisplayAsDebug(&self.inner))
            .finish()
    }
}

/// Checks a condition, logging if it fails.
///
/// If the condition does not hold, constructs the given error, logs it, and
/// returns out of the current function with it.
macro_rules! check {
    ($cond:expr, $error:expr) => {
        if !$cond {
            let error = $error;
            return Err(fail!(
                error,
                "check failure: `{}`; returned {:?}",
                stringify!($cond),
                error,
            ));
        }
    };
}

/// Logs a newly-created error value and returns it.
///
/// This macro is the main way to generate [`Error`] values.
///
/// For example, instead of writing `foo.ok_or(MyError)`, instead write
/// `foo.ok_or_else(|| fail!(MyError))`.
macro_rules! fail {
    ($error:expr, $($format:tt)+) => {{
        error!($($format)+);
        $crate::debug::Error::__new($error)
    }};
    ($error:expr) => {{
        let error = $error;
        error!("generated error: `{:?}`", error);
        $crate::debug::Error::__new(error)
    }};
}

/// Like [`fail!()`], but for errors that are expected in normal operation
/// and that the caller is expected to retry; these are logged as warnings.
macro_rules! retry {
    ($error:expr, $($format:tt)+) => {{
        warn!($($format)+);
        $crate::debug::Error::__new($error)
    }};
}

/// Redactable version of [`log::trace!()`].
macro_rules! trace {
    ($($args:tt)*) => {
        #[cfg(feature = "log")]
        let _ = __raw_log::trace!($($args)*);
        #[cfg(not(feature = "log"))]
        let _ = || {
            let _ = format_args!($($args)*);
        };
    }
}

/// Redactable version of [`log::info!()`].
macro_rules! info {
    ($($args:tt)*) => {
        #[cfg(feature = "log")]
        let _ = __raw_log::info!($($args)*);
        #[cfg(not(feature = "log"))]
        let _ = || {
            let _ = format_args!($($args)*);
        };
    }
}

/// Redactable version of [`log::warn!()`].
macro_rules! warn {
    ($($args:tt)*) => {
        #[cfg(feature = "log")]
        let _ = __raw_log::warn!($($args)*);
        #[cfg(not(feature = "log"))]
        let _ = || {
            let _ = format_args!($($args)*);
        };
    }
}

/// Redactable version of [`log::error!()`].
macro_rules! error {
    ($($args:tt)*) => {
        #[cfg(feature = "log")]
        let _ = __raw_log::error!($($args)*);
        #[cfg(not(feature = "log"))]
        let _ = || {
            let _ = format_args!($($args)*);
        };
    }
}

/// Set up some life-before-main code that initializes a basic logger for the
/// test binary.
///
/// This needs to happen here, since the test binary's main() cannot be
/// overridden.
#[cfg(test)]
#[ctor::ctor]
fn init_test_logger() {
    env_logger::builder()
        .format(move |_, record| {
            let thread = std::thread::current();
            let name = thread.name().unwrap_or("<unknown>");
            for line in record.args().to_string().trim().lines() {
                // NOTE: we explicitly print to stderr, since this allows the
                // Rust test harness to suppress log statements originating from
                // passing tests.
                eprintln!(
                    "[{level}({thread}) {file}:{line}] {msg}",
                    level = record.level(),
                    thread = name,
                    file = record.file().unwrap_or("<unknown>"),
                    line = record.line().unwrap_or(0),
                    msg = line,
                )
            }
            Ok(())
        })
        .init();
}

#[cfg(test)]
mod test {
    use super::*;

    fn checked(ok: bool) -> Result<u32, Error<u8>> {
        check!(ok, 7u8);
        Ok(1)
    }

    #[test]
    fn check_returns_error_on_false() {
        assert_eq!(checked(true), Ok(1));
        assert_eq!(checked(false).unwrap_err().into_inner(), 7);
    }

    fn logged_only(sample: u32, trip: &str) {
        trace!("sample {:#x}", sample);
        warn!("trip {} crossed", trip);
    }

    // Without the `log` feature this only compiles if redaction still
    // counts the arguments as used.
    #[test]
    fn redacted_arguments_are_used() {
        logged_only(0x2d, "passive");
    }

    #[test]
    fn cast_converts_inner() {
        let e: Error<u8> = Error::__new(3);
        let wide: Error<u32> = e.cast();
        assert_eq!(*wide.as_ref(), 3u32);
    }
}
