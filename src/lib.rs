//! # Sans-await: resumable procedures as awaitables
//!
//! Write asynchronous control flow as a straight-line procedure that suspends on
//! awaitables, and get back a single awaitable for the whole computation.
//!
//! ## Core Pieces
//!
//! - **[`Procedure`]**: a computation resumed from the outside with a value or an
//!   injected failure, reporting a [`Step`] each time
//! - **[`Awaitable`]**: an eventual value or failure observed through a callback
//! - **[`Coroutine`]**: drives a procedure, waiting on whatever it yields, and is
//!   itself an awaitable
//! - **[`Scheduler`]**: runs deferred callbacks; the driver uses it to keep long
//!   chains of already-settled awaitables from growing the stack
//!
//! ## Example
//!
//! ```
//! use sans_await::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Error {
//!     Timeout,
//!     Protocol(UnexpectedYield),
//! }
//!
//! impl From<UnexpectedYield> for Error {
//!     fn from(err: UnexpectedYield) -> Self {
//!         Error::Protocol(err)
//!     }
//! }
//!
//! let queue = Queue::new();
//! let reply = Promise::<u32, Error>::new();
//!
//! // Retry once on timeout, then give up.
//! let request = coroutine(
//!     generator({
//!         let reply = reply.clone();
//!         move |s: Suspender<Promise<u32, Error>, u32, Error>| async move {
//!             match s.suspend(reply).await {
//!                 Ok(n) => Ok(n),
//!                 Err(Error::Timeout) => s.suspend(Promise::resolved(0)).await,
//!                 Err(other) => Err(other),
//!             }
//!         }
//!     }),
//!     queue.clone(),
//! );
//!
//! reply.fail(Error::Timeout).unwrap();
//! queue.run_until_idle();
//! assert_eq!(request.outcome(), Some(Ok(0)));
//! ```
//!
//! ## Common Functions
//!
//! **Building Procedures:**
//! - [`from_fn(f)`](build::from_fn) - Explicit state machine over each [`Resume`]
//! - [`generator(body)`](build::generator) - `async` body suspending with `.await`
//!
//! **Driving:**
//! - [`coroutine(procedure, scheduler)`] - Start a [`Coroutine`]
//! - [`Coroutine::with_config`] - Start one with a custom [`DriverConfig`]

mod awaitable;
pub mod build;
mod driver;
mod error;
pub mod prelude;
mod procedure;
mod promise;
mod scheduler;
mod step;

pub use awaitable::*;
pub use driver::*;
pub use error::*;
pub use procedure::*;
pub use promise::*;
pub use scheduler::*;
pub use step::*;
