//! The awaitable contract and how yielded values are interpreted.
//!
//! An [`Awaitable`] eventually holds a value or a failure and tells observers
//! about it through a completion callback. A procedure driven by a
//! [`Coroutine`](crate::Coroutine) suspends by yielding something that converts
//! into an awaitable via [`IntoAwaitable`]; anything else is a protocol error.

use std::rc::Rc;

use crate::error::UnexpectedYield;

/// Completion callback, handed the outcome exactly once.
pub type Callback<T, E> = Box<dyn FnOnce(Result<T, E>)>;

/// A value that eventually succeeds with `T` or fails with `E`.
///
/// If the outcome is already known, `when` may run the callback before it
/// returns; otherwise the callback runs once the outcome arrives. Callers must
/// cope with either.
pub trait Awaitable<T, E> {
    /// Register a completion callback.
    fn when(&self, callback: Callback<T, E>);
}

impl<T, E, A> Awaitable<T, E> for Box<A>
where
    A: Awaitable<T, E> + ?Sized,
{
    fn when(&self, callback: Callback<T, E>) {
        (**self).when(callback)
    }
}

impl<T, E, A> Awaitable<T, E> for Rc<A>
where
    A: Awaitable<T, E> + ?Sized,
{
    fn when(&self, callback: Callback<T, E>) {
        (**self).when(callback)
    }
}

/// Conversion from a yielded value to the awaitable the driver waits on.
///
/// Returning `Err` marks the value as something a procedure must not suspend
/// on; the driver fails the coroutine with that error.
pub trait IntoAwaitable<T, E> {
    type Awaitable: Awaitable<T, E>;

    fn into_awaitable(self) -> Result<Self::Awaitable, UnexpectedYield>;
}

impl<T, E> IntoAwaitable<T, E> for Box<dyn Awaitable<T, E>> {
    type Awaitable = Self;

    fn into_awaitable(self) -> Result<Self, UnexpectedYield> {
        Ok(self)
    }
}

/// `Left` is waited on; `Right` is a plain value and a protocol error.
///
/// Lets a procedure's yield type carry values it should never suspend on while
/// still reporting which type showed up.
impl<T, E, L, R> IntoAwaitable<T, E> for either::Either<L, R>
where
    L: IntoAwaitable<T, E>,
{
    type Awaitable = L::Awaitable;

    fn into_awaitable(self) -> Result<Self::Awaitable, UnexpectedYield> {
        match self {
            either::Either::Left(l) => l.into_awaitable(),
            either::Either::Right(_) => Err(UnexpectedYield::of::<R>()),
        }
    }
}
