use std::marker::PhantomData;

use crate::procedure::{Procedure, Resume, Resumed};
use crate::step::Step;

/// A procedure driven by a closure that sees every resumption.
///
/// Created via [`from_fn`]. The closure is an explicit state machine: it receives
/// each [`Resume`] and answers with the next [`Step`] or an escaping failure.
pub struct FromFn<F, I, E> {
    f: F,
    active: bool,
    _resume: PhantomData<fn(Resume<I, E>)>,
}

/// Create a procedure from a closure.
///
/// The procedure becomes inactive once the closure returns `Step::Complete` or
/// an `Err`, after which the closure is never called again.
///
/// ```rust
/// use sans_await::prelude::*;
///
/// let mut seen = Vec::new();
/// let mut summing = from_fn(move |resume: Resume<u32, String>| match resume {
///     Resume::Start => Ok(Step::Yielded(())),
///     Resume::Value(0) => Ok(Step::Complete(seen.iter().sum::<u32>())),
///     Resume::Value(v) => {
///         seen.push(v);
///         Ok(Step::Yielded(()))
///     }
///     Resume::Fail(e) => Err(e),
/// });
///
/// assert!(summing.start().unwrap().is_yielded());
/// assert!(summing.send(2).unwrap().is_yielded());
/// assert!(summing.send(3).unwrap().is_yielded());
/// assert_eq!(summing.send(0), Ok(Step::Complete(5)));
/// ```
pub fn from_fn<I, Y, R, E, F>(f: F) -> FromFn<F, I, E>
where
    F: FnMut(Resume<I, E>) -> Result<Step<Y, R>, E>,
{
    FromFn {
        f,
        active: true,
        _resume: PhantomData,
    }
}

impl<I, Y, R, E, F> Procedure for FromFn<F, I, E>
where
    F: FnMut(Resume<I, E>) -> Result<Step<Y, R>, E>,
{
    type Input = I;
    type Yield = Y;
    type Return = R;
    type Error = E;

    /// # Panics
    ///
    /// Panics if a finished procedure is resumed with anything but a failure.
    /// A failure thrown into a finished procedure is handed straight back.
    fn resume(&mut self, resume: Resume<I, E>) -> Resumed<Self> {
        if !self.active {
            match resume {
                Resume::Fail(error) => return Err(error),
                _ => panic!("resumed a procedure that already finished"),
            }
        }

        let resumed = (self.f)(resume);
        self.active = matches!(resumed, Ok(Step::Yielded(_)));
        resumed
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping_failure_finishes_procedure() {
        let mut calls = 0;
        let mut procedure = from_fn(|resume: Resume<(), &str>| {
            calls += 1;
            match resume {
                Resume::Fail(e) => Err(e),
                _ => Ok(Step::<u8, ()>::Yielded(1)),
            }
        });

        assert_eq!(procedure.start(), Ok(Step::Yielded(1)));
        assert_eq!(procedure.throw("boom"), Err("boom"));
        assert!(!procedure.is_active());

        // Thrown straight back without reaching the closure.
        assert_eq!(procedure.throw("again"), Err("again"));
        drop(procedure);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_caught_failure_keeps_procedure_active() {
        let mut procedure = from_fn(|resume: Resume<i32, &str>| match resume {
            Resume::Start => Ok(Step::Yielded("waiting")),
            Resume::Fail(_) => Ok(Step::Yielded("recovered")),
            Resume::Value(v) => Ok(Step::Complete(v)),
        });

        assert_eq!(procedure.start(), Ok(Step::Yielded("waiting")));
        assert_eq!(procedure.throw("boom"), Ok(Step::Yielded("recovered")));
        assert!(procedure.is_active());
        assert_eq!(procedure.send(7), Ok(Step::Complete(7)));
        assert!(!procedure.is_active());
    }

    #[test]
    #[should_panic(expected = "resumed a procedure that already finished")]
    fn test_sending_to_finished_procedure_panics() {
        let mut procedure =
            from_fn(|_: Resume<i32, &str>| Ok::<Step<(), i32>, &str>(Step::Complete(0)));
        let _ = procedure.start();
        let _ = procedure.send(1);
    }
}
