use std::future::Future;
use std::pin::Pin;

use genawaiter::GeneratorState;
use genawaiter::rc::{Co, Gen};

use crate::procedure::{Procedure, Resume, Resumed};
use crate::step::Step;

type Body<R, E> = Pin<Box<dyn Future<Output = Result<R, E>>>>;

/// Handle an `async` procedure body uses to suspend.
///
/// Passed to the body by [`generator`]. Every call to
/// [`suspend`](Suspender::suspend) is one suspension point of the procedure.
pub struct Suspender<Y, I, E> {
    co: Co<Y, Resume<I, E>>,
}

impl<Y, I, E> Suspender<Y, I, E> {
    /// Suspend on `yielded` until the procedure is resumed.
    ///
    /// Resolves to `Ok` with the value the procedure was continued with, or to
    /// `Err` with the failure injected at this point. Propagating the `Err` with
    /// `?` lets it escape the procedure; matching on it recovers.
    pub async fn suspend(&self, yielded: Y) -> Result<I, E> {
        match self.co.yield_(yielded).await {
            Resume::Value(input) => Ok(input),
            Resume::Fail(error) => Err(error),
            // Rejected by `Generator::resume` once the body has started.
            Resume::Start => unreachable!("start signal delivered to a suspended generator"),
        }
    }
}

/// A procedure whose body is an `async` block.
///
/// Created via [`generator`].
pub struct Generator<Y, I, R, E> {
    body: Gen<Y, Resume<I, E>, Body<R, E>>,
    started: bool,
    active: bool,
}

/// Create a procedure from an `async` body.
///
/// The body runs when the procedure is started and suspends at every
/// [`Suspender::suspend`]. Its output is the procedure's result: `Ok` finishes
/// it with a return value, `Err` lets a failure escape.
///
/// ```rust
/// use sans_await::prelude::*;
///
/// let mut procedure = generator(|s: Suspender<&'static str, i32, String>| async move {
///     let a = s.suspend("a").await?;
///     let b = match s.suspend("b").await {
///         Ok(b) => b,
///         Err(_) => 100,
///     };
///     Ok::<_, String>(a + b)
/// });
///
/// assert_eq!(procedure.start(), Ok(Step::Yielded("a")));
/// assert_eq!(procedure.send(1), Ok(Step::Yielded("b")));
/// assert_eq!(procedure.throw("lost".to_string()), Ok(Step::Complete(101)));
/// assert!(!procedure.is_active());
/// ```
pub fn generator<Y, I, R, E, F, Fut>(body: F) -> Generator<Y, I, R, E>
where
    Y: 'static,
    I: 'static,
    R: 'static,
    E: 'static,
    F: FnOnce(Suspender<Y, I, E>) -> Fut,
    Fut: Future<Output = Result<R, E>> + 'static,
{
    let body = Gen::new(move |co| -> Body<R, E> { Box::pin(body(Suspender { co })) });
    Generator {
        body,
        started: false,
        active: true,
    }
}

impl<Y, I, R, E> Procedure for Generator<Y, I, R, E> {
    type Input = I;
    type Yield = Y;
    type Return = R;
    type Error = E;

    /// The first resumption only starts the body; a value sent in place of
    /// [`Resume::Start`] is discarded. A failure thrown before the body started
    /// finishes the procedure without running it.
    ///
    /// # Panics
    ///
    /// Panics if a finished procedure is resumed with anything but a failure,
    /// or if a started one is given [`Resume::Start`] again.
    fn resume(&mut self, resume: Resume<I, E>) -> Resumed<Self> {
        if !self.active {
            match resume {
                Resume::Fail(error) => return Err(error),
                _ => panic!("resumed a generator that already finished"),
            }
        }

        if self.started && matches!(resume, Resume::Start) {
            panic!("started a generator that is already running");
        }

        if !self.started {
            self.started = true;
            if let Resume::Fail(error) = resume {
                self.active = false;
                return Err(error);
            }
        }

        match self.body.resume_with(resume) {
            GeneratorState::Yielded(yielded) => Ok(Step::Yielded(yielded)),
            GeneratorState::Complete(result) => {
                self.active = false;
                result.map(Step::Complete)
            }
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
