//! A single-threaded, write-once awaitable.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use crate::awaitable::{Awaitable, Callback, IntoAwaitable};
use crate::error::{SettleError, UnexpectedYield};

enum State<T, E> {
    Pending(Vec<Callback<T, E>>),
    Settled(Result<T, E>),
}

/// An outcome that is settled at most once, observed by any number of
/// callbacks.
///
/// Clones share the same state. Observers registered before settlement run in
/// registration order when it settles; observers registered afterwards run
/// immediately, inside [`when`](Awaitable::when).
///
/// ```rust
/// use sans_await::prelude::*;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let promise = Promise::<u32, String>::new();
/// let seen = Rc::new(Cell::new(0));
/// promise.when(Box::new({
///     let seen = Rc::clone(&seen);
///     move |outcome: Result<u32, String>| seen.set(outcome.unwrap_or_default())
/// }));
///
/// promise.resolve(9).unwrap();
/// assert_eq!(seen.get(), 9);
/// assert_eq!(promise.fail("late".into()), Err(SettleError::AlreadySettled));
/// ```
pub struct Promise<T, E> {
    state: Rc<RefCell<State<T, E>>>,
}

impl<T, E> Promise<T, E> {
    /// A pending promise.
    pub fn new() -> Self {
        Promise {
            state: Rc::new(RefCell::new(State::Pending(Vec::new()))),
        }
    }

    /// A promise already resolved with `value`.
    pub fn resolved(value: T) -> Self {
        Self::settled(Ok(value))
    }

    /// A promise already failed with `error`.
    pub fn failed(error: E) -> Self {
        Self::settled(Err(error))
    }

    fn settled(outcome: Result<T, E>) -> Self {
        Promise {
            state: Rc::new(RefCell::new(State::Settled(outcome))),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.state.borrow(), State::Pending(_))
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone,
    E: Clone,
{
    pub fn resolve(&self, value: T) -> Result<(), SettleError> {
        self.settle(Ok(value))
    }

    pub fn fail(&self, error: E) -> Result<(), SettleError> {
        self.settle(Err(error))
    }

    /// Settle with `outcome` and notify every registered observer.
    ///
    /// Observers run after the promise is marked settled, so an observer that
    /// registers on this promise again is called immediately.
    pub fn settle(&self, outcome: Result<T, E>) -> Result<(), SettleError> {
        let observers = {
            let mut state = self.state.borrow_mut();
            if matches!(*state, State::Settled(_)) {
                return Err(SettleError::AlreadySettled);
            }
            match mem::replace(&mut *state, State::Settled(outcome.clone())) {
                State::Pending(observers) => observers,
                State::Settled(_) => Vec::new(),
            }
        };

        for observer in observers {
            observer(outcome.clone());
        }
        Ok(())
    }

    /// The outcome, if settled.
    pub fn outcome(&self) -> Option<Result<T, E>> {
        match &*self.state.borrow() {
            State::Pending(_) => None,
            State::Settled(outcome) => Some(outcome.clone()),
        }
    }
}

impl<T, E> Awaitable<T, E> for Promise<T, E>
where
    T: Clone,
    E: Clone,
{
    fn when(&self, callback: Callback<T, E>) {
        let settled = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                State::Pending(observers) => {
                    observers.push(callback);
                    return;
                }
                State::Settled(outcome) => outcome.clone(),
            }
        };
        callback(settled);
    }
}

impl<T, E> IntoAwaitable<T, E> for Promise<T, E>
where
    T: Clone,
    E: Clone,
{
    type Awaitable = Self;

    fn into_awaitable(self) -> Result<Self, UnexpectedYield> {
        Ok(self)
    }
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Promise {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T, E> Default for Promise<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for Promise<T, E>
where
    T: fmt::Debug,
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.borrow() {
            State::Pending(observers) => f
                .debug_struct("Promise")
                .field("observers", &observers.len())
                .finish(),
            State::Settled(outcome) => f.debug_struct("Promise").field("outcome", outcome).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(
        log: &Rc<RefCell<Vec<String>>>,
        name: &'static str,
    ) -> Callback<u32, String> {
        let log = Rc::clone(log);
        Box::new(move |outcome: Result<u32, String>| {
            log.borrow_mut().push(format!("{name}:{outcome:?}"));
        })
    }

    #[test]
    fn test_observers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let promise = Promise::new();
        promise.when(recorder(&log, "a"));
        promise.when(recorder(&log, "b"));

        assert!(promise.is_pending());
        assert!(log.borrow().is_empty());

        promise.resolve(3).unwrap();
        assert_eq!(&*log.borrow(), &["a:Ok(3)", "b:Ok(3)"]);
        assert_eq!(promise.outcome(), Some(Ok(3)));
    }

    #[test]
    fn test_settled_promise_calls_back_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let promise = Promise::failed("nope".to_string());
        promise.when(recorder(&log, "late"));
        assert_eq!(&*log.borrow(), &["late:Err(\"nope\")"]);
    }

    #[test]
    fn test_settles_only_once() {
        let promise = Promise::<u32, String>::new();
        assert_eq!(promise.fail("first".to_string()), Ok(()));
        assert_eq!(promise.resolve(1), Err(SettleError::AlreadySettled));
        assert_eq!(promise.outcome(), Some(Err("first".to_string())));
    }

    #[test]
    fn test_observer_may_register_again_during_settlement() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let promise = Promise::<u32, String>::new();
        promise.when(Box::new({
            let promise = promise.clone();
            let log = Rc::clone(&log);
            move |_| promise.when(recorder(&log, "again"))
        }));

        promise.resolve(8).unwrap();
        assert_eq!(&*log.borrow(), &["again:Ok(8)"]);
    }

    #[test]
    fn test_clones_share_state() {
        let promise = Promise::<u32, String>::new();
        let other = promise.clone();
        other.resolve(4).unwrap();
        assert!(!promise.is_pending());
        assert_eq!(promise.outcome(), Some(Ok(4)));
    }
}
