//! Errors raised by the driver itself, as opposed to failures produced by the
//! procedures it drives.

use std::any::type_name;

use thiserror::Error;

/// A procedure suspended on something the driver cannot wait on.
///
/// The driver reports this as the coroutine's failure, so procedure error types
/// must be constructible from it (usually through a `#[from]` variant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("procedure yielded a non-awaitable value of type `{type_name}`")]
pub struct UnexpectedYield {
    /// Type name of the offending value.
    pub type_name: &'static str,
}

impl UnexpectedYield {
    /// Protocol error for a yielded value of type `T`.
    pub fn of<T: ?Sized>() -> Self {
        UnexpectedYield {
            type_name: type_name::<T>(),
        }
    }
}

/// Errors from settling a [`Promise`](crate::Promise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SettleError {
    /// The promise was already resolved or failed.
    #[error("promise already settled")]
    AlreadySettled,
}
