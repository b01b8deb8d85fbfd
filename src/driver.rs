//! Driving a procedure as an awaitable.
//!
//! A [`Coroutine`] owns a [`Procedure`] and resumes it every time the awaitable
//! it last suspended on completes. Successful outcomes are sent into the
//! procedure, failures are thrown into it. When the procedure returns, the
//! coroutine resolves with the return value; when a failure escapes, the
//! procedure is first unwound to its end and the coroutine then fails.
//!
//! Chains of awaitables that are already settled would otherwise resume the
//! procedure recursively from inside `when`. The driver counts that nesting and,
//! past [`DriverConfig::max_depth`], hands the next resumption to the
//! [`Scheduler`] instead of recursing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::awaitable::{Awaitable, Callback, IntoAwaitable};
use crate::error::UnexpectedYield;
use crate::procedure::{Procedure, Resume};
use crate::promise::Promise;
use crate::scheduler::Scheduler;
use crate::step::Step;

/// Synchronous resumptions allowed to nest before the driver defers.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Tuning for a [`Coroutine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Nesting depth of synchronous resumptions past which the next
    /// resumption goes through the scheduler.
    pub max_depth: usize,
}

impl DriverConfig {
    pub const fn new() -> Self {
        DriverConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new()
    }
}

struct Driver<P: Procedure> {
    // `None` once the coroutine has settled.
    procedure: Option<P>,
    depth: usize,
    config: DriverConfig,
    scheduler: Rc<dyn Scheduler>,
    promise: Promise<P::Return, P::Error>,
}

type Shared<P> = Rc<RefCell<Driver<P>>>;

impl<P> Driver<P>
where
    P: Procedure + 'static,
    P::Input: 'static,
    P::Yield: IntoAwaitable<P::Input, P::Error>,
    P::Return: Clone + 'static,
    P::Error: From<UnexpectedYield> + Clone + 'static,
{
    /// Resume the procedure once and act on where it stopped.
    fn step(this: &Shared<P>, resume: Resume<P::Input, P::Error>) {
        let resumed = {
            let mut driver = this.borrow_mut();
            if driver.depth > driver.config.max_depth {
                debug!(depth = driver.depth, "deferring resumption to the scheduler");
                let scheduler = Rc::clone(&driver.scheduler);
                drop(driver);
                let this = Rc::clone(this);
                scheduler.defer(Box::new(move || Self::step(&this, resume)));
                return;
            }

            if !driver.promise.is_pending() {
                driver.procedure = None;
            }
            let Some(procedure) = driver.procedure.as_mut() else {
                warn!("ignoring resumption of a settled coroutine");
                return;
            };
            trace!(fail = resume.is_fail(), "resuming procedure");
            procedure.resume(resume)
        };

        match resumed {
            Ok(Step::Yielded(yielded)) => match yielded.into_awaitable() {
                Ok(awaitable) => Self::wait_on(this, awaitable),
                Err(unexpected) => {
                    debug!(%unexpected, "procedure broke the yield protocol");
                    Self::dispose(this, P::Error::from(unexpected));
                }
            },
            Ok(Step::Complete(value)) => Self::settle(this, Ok(value)),
            Err(error) => Self::dispose(this, error),
        }
    }

    /// Register the continuation on `awaitable`. The depth bracket covers only
    /// the registration, which is where a settled awaitable calls back inline.
    fn wait_on<A>(this: &Shared<P>, awaitable: A)
    where
        A: Awaitable<P::Input, P::Error>,
    {
        this.borrow_mut().depth += 1;
        let continuation: Callback<P::Input, P::Error> = {
            let this = Rc::clone(this);
            Box::new(move |outcome: Result<P::Input, P::Error>| {
                Self::step(&this, Resume::from(outcome))
            })
        };
        awaitable.when(continuation);
        this.borrow_mut().depth -= 1;
    }

    /// Throw `error` into the procedure until it finishes, then fail with the
    /// last failure that escaped it.
    fn dispose(this: &Shared<P>, error: P::Error) {
        let failure = {
            let mut driver = this.borrow_mut();
            let mut failure = error;
            let mut rounds = 0usize;
            if let Some(procedure) = driver.procedure.as_mut() {
                while procedure.is_active() {
                    rounds += 1;
                    if let Err(raised) = procedure.throw(failure.clone()) {
                        failure = raised;
                    }
                }
            }
            debug!(rounds, "procedure unwound after failure");
            failure
        };
        Self::settle(this, Err(failure));
    }

    fn settle(this: &Shared<P>, outcome: Result<P::Return, P::Error>) {
        let (procedure, promise) = {
            let mut driver = this.borrow_mut();
            (driver.procedure.take(), driver.promise.clone())
        };
        drop(procedure);

        trace!(ok = outcome.is_ok(), "coroutine settled");
        if let Err(error) = promise.settle(outcome) {
            warn!(%error, "coroutine outcome rejected");
        }
    }
}

/// A procedure driven to completion as an awaitable.
///
/// Construction starts the procedure immediately and runs it up to its first
/// suspension, so a procedure that never suspends produces a coroutine that is
/// already settled. From then on the coroutine advances only when the awaitable
/// it is suspended on completes.
///
/// Procedure error types absorb protocol errors through
/// `From<UnexpectedYield>`, usually a `#[from]` variant of an error enum.
///
/// Only the coroutine settles its outcome; observers see it through
/// [`when`](Awaitable::when), [`outcome`](Coroutine::outcome) and
/// [`is_pending`](Coroutine::is_pending).
///
/// Nesting depth is counted per coroutine. A long chain of coroutines each
/// awaiting the next, all woken by one settlement, still recurses once per
/// link.
///
/// ```rust
/// use sans_await::prelude::*;
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Error {
///     Protocol(UnexpectedYield),
/// }
///
/// impl From<UnexpectedYield> for Error {
///     fn from(err: UnexpectedYield) -> Self {
///         Error::Protocol(err)
///     }
/// }
///
/// let queue = Queue::new();
/// let first = Promise::<i32, Error>::new();
/// let second = Promise::<i32, Error>::new();
///
/// let sum = Coroutine::new(
///     generator({
///         let (first, second) = (first.clone(), second.clone());
///         move |s: Suspender<Promise<i32, Error>, i32, Error>| async move {
///             let a = s.suspend(first).await?;
///             let b = s.suspend(second).await?;
///             Ok::<_, Error>(a + b)
///         }
///     }),
///     queue.clone(),
/// );
///
/// first.resolve(1).unwrap();
/// assert!(sum.is_pending());
/// second.resolve(2).unwrap();
/// assert_eq!(sum.outcome(), Some(Ok(3)));
/// ```
pub struct Coroutine<P: Procedure> {
    driver: Shared<P>,
    promise: Promise<P::Return, P::Error>,
}

impl<P> Coroutine<P>
where
    P: Procedure + 'static,
    P::Input: 'static,
    P::Yield: IntoAwaitable<P::Input, P::Error>,
    P::Return: Clone + 'static,
    P::Error: From<UnexpectedYield> + Clone + 'static,
{
    /// Start driving `procedure` with the default [`DriverConfig`].
    pub fn new<S>(procedure: P, scheduler: S) -> Self
    where
        S: Scheduler + 'static,
    {
        Self::with_config(procedure, scheduler, DriverConfig::default())
    }

    /// Start driving `procedure`.
    pub fn with_config<S>(procedure: P, scheduler: S, config: DriverConfig) -> Self
    where
        S: Scheduler + 'static,
    {
        let promise = Promise::new();
        let driver = Rc::new(RefCell::new(Driver {
            procedure: Some(procedure),
            depth: 0,
            config,
            scheduler: Rc::new(scheduler),
            promise: promise.clone(),
        }));

        Driver::step(&driver, Resume::Start);
        Coroutine { driver, promise }
    }
}

impl<P: Procedure> Coroutine<P> {
    pub fn is_pending(&self) -> bool {
        self.promise.is_pending()
    }
}

impl<P> Coroutine<P>
where
    P: Procedure,
    P::Return: Clone,
    P::Error: Clone,
{
    /// The outcome, if settled.
    pub fn outcome(&self) -> Option<Result<P::Return, P::Error>> {
        self.promise.outcome()
    }
}

/// Start driving `procedure` with the default [`DriverConfig`].
///
/// Shorthand for [`Coroutine::new`].
pub fn coroutine<P, S>(procedure: P, scheduler: S) -> Coroutine<P>
where
    P: Procedure + 'static,
    P::Input: 'static,
    P::Yield: IntoAwaitable<P::Input, P::Error>,
    P::Return: Clone + 'static,
    P::Error: From<UnexpectedYield> + Clone + 'static,
    S: Scheduler + 'static,
{
    Coroutine::new(procedure, scheduler)
}

impl<P> Awaitable<P::Return, P::Error> for Coroutine<P>
where
    P: Procedure,
    P::Return: Clone,
    P::Error: Clone,
{
    fn when(&self, callback: Callback<P::Return, P::Error>) {
        self.promise.when(callback)
    }
}

impl<P> IntoAwaitable<P::Return, P::Error> for Coroutine<P>
where
    P: Procedure,
    P::Return: Clone,
    P::Error: Clone,
{
    type Awaitable = Self;

    fn into_awaitable(self) -> Result<Self, UnexpectedYield> {
        Ok(self)
    }
}

impl<P: Procedure> Clone for Coroutine<P> {
    fn clone(&self) -> Self {
        Coroutine {
            driver: Rc::clone(&self.driver),
            promise: self.promise.clone(),
        }
    }
}

impl<P: Procedure> fmt::Debug for Coroutine<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Coroutine");
        // Borrowed mutably while the procedure itself is running.
        match self.driver.try_borrow() {
            Ok(driver) => s
                .field("depth", &driver.depth)
                .field("active", &driver.procedure.is_some()),
            Err(_) => s.field("running", &true),
        };
        s.field("pending", &self.promise.is_pending()).finish()
    }
}
