//! Core trait for resumable procedures.
//!
//! A [`Procedure`] is a computation that runs until it suspends on a value and can
//! later be continued either with an input value or by injecting a failure at the
//! suspension point. The [`Coroutine`](crate::Coroutine) driver is the only thing
//! that resumes a procedure once it has been handed over.
//!
//! # Examples
//!
//! ```rust
//! use sans_await::prelude::*;
//!
//! let mut calls = 0;
//! let mut procedure = from_fn(move |resume: Resume<i32, String>| {
//!     calls += 1;
//!     match resume {
//!         Resume::Start => Ok(Step::Yielded("first")),
//!         Resume::Value(v) => Ok(Step::Complete(v + calls)),
//!         Resume::Fail(e) => Err(e),
//!     }
//! });
//!
//! assert_eq!(procedure.start(), Ok(Step::Yielded("first")));
//! assert!(procedure.is_active());
//! assert_eq!(procedure.send(40), Ok(Step::Complete(42)));
//! assert!(!procedure.is_active());
//! ```

use crate::step::Step;

/// How a procedure is resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resume<I, E> {
    /// Run from the beginning up to the first suspension.
    Start,
    /// Continue the current suspension with a value.
    Value(I),
    /// Raise a failure at the current suspension.
    Fail(E),
}

impl<I, E> Resume<I, E> {
    /// Returns `true` for an injected failure.
    #[inline]
    pub const fn is_fail(&self) -> bool {
        matches!(self, Resume::Fail(_))
    }
}

impl<I, E> From<Result<I, E>> for Resume<I, E> {
    fn from(outcome: Result<I, E>) -> Self {
        match outcome {
            Ok(value) => Resume::Value(value),
            Err(error) => Resume::Fail(error),
        }
    }
}

/// Result of a single resumption: the next [`Step`], or the failure that escaped
/// the procedure.
pub type Resumed<P> = Result<
    Step<<P as Procedure>::Yield, <P as Procedure>::Return>,
    <P as Procedure>::Error,
>;

/// A computation that suspends on values and is continued from the outside.
///
/// Each call to [`resume`](Procedure::resume) runs the procedure up to its next
/// suspension point (`Step::Yielded`) or to its end (`Step::Complete`). A failure
/// that escapes the procedure is returned as `Err`; whether the procedure is still
/// active afterwards is reported by [`is_active`](Procedure::is_active).
pub trait Procedure {
    /// Value a suspension is continued with.
    type Input;
    /// Value the procedure suspends on.
    type Yield;
    /// Value the procedure finishes with.
    type Return;
    /// Failure injected into, or escaping from, the procedure.
    type Error;

    /// Resume the procedure once.
    fn resume(&mut self, resume: Resume<Self::Input, Self::Error>) -> Resumed<Self>;

    /// `false` once the procedure has run to its end.
    fn is_active(&self) -> bool;

    /// Run up to the first suspension; the yielded value is the procedure's
    /// current suspension.
    fn start(&mut self) -> Resumed<Self> {
        self.resume(Resume::Start)
    }

    /// Continue the current suspension with `input`.
    fn send(&mut self, input: Self::Input) -> Resumed<Self> {
        self.resume(Resume::Value(input))
    }

    /// Raise `error` at the current suspension.
    fn throw(&mut self, error: Self::Error) -> Resumed<Self> {
        self.resume(Resume::Fail(error))
    }
}

impl<P> Procedure for Box<P>
where
    P: Procedure + ?Sized,
{
    type Input = P::Input;
    type Yield = P::Yield;
    type Return = P::Return;
    type Error = P::Error;

    fn resume(&mut self, resume: Resume<Self::Input, Self::Error>) -> Resumed<Self> {
        (**self).resume(resume)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

impl<L, R> Procedure for either::Either<L, R>
where
    L: Procedure,
    R: Procedure<Input = L::Input, Yield = L::Yield, Return = L::Return, Error = L::Error>,
{
    type Input = L::Input;
    type Yield = L::Yield;
    type Return = L::Return;
    type Error = L::Error;

    fn resume(&mut self, resume: Resume<Self::Input, Self::Error>) -> Resumed<Self> {
        match self {
            either::Either::Left(l) => l.resume(resume),
            either::Either::Right(r) => r.resume(resume),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            either::Either::Left(l) => l.is_active(),
            either::Either::Right(r) => r.is_active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::from_fn;
    use either::Either;

    type Boxed = Box<dyn Procedure<Input = u32, Yield = u32, Return = u32, Error = String>>;

    fn countdown(
        from: u32,
    ) -> impl Procedure<Input = u32, Yield = u32, Return = u32, Error = String> + 'static {
        let mut left = from;
        from_fn(move |resume: Resume<u32, String>| match resume {
            Resume::Fail(e) => Err(e),
            _ if left == 0 => Ok(Step::Complete(from)),
            _ => {
                left -= 1;
                Ok(Step::Yielded(left))
            }
        })
    }

    #[test]
    fn test_resume_from_result() {
        assert_eq!(Resume::<u8, &str>::from(Ok(1)), Resume::Value(1));
        assert_eq!(Resume::<u8, &str>::from(Err("no")), Resume::Fail("no"));
        assert!(Resume::<u8, &str>::Fail("no").is_fail());
        assert!(!Resume::<u8, &str>::Start.is_fail());
    }

    #[test]
    fn test_boxed_procedure_forwards() {
        let mut boxed: Boxed = Box::new(countdown(2));

        assert_eq!(boxed.start(), Ok(Step::Yielded(1)));
        assert_eq!(boxed.send(0), Ok(Step::Yielded(0)));
        assert_eq!(boxed.send(0), Ok(Step::Complete(2)));
        assert!(!boxed.is_active());
    }

    #[test]
    fn test_either_procedure_forwards_to_active_side() {
        let mut left: Either<_, Boxed> = Either::Left(countdown(1));
        assert_eq!(left.start(), Ok(Step::Yielded(0)));
        assert_eq!(left.throw("stop".to_string()), Err("stop".to_string()));
        assert!(!left.is_active());

        let mut right: Either<Boxed, _> = Either::Right(countdown(0));
        assert_eq!(right.start(), Ok(Step::Complete(0)));
        assert!(!right.is_active());
    }
}
