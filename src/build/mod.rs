//! Building procedures from scratch
//!
//! Two ways to write a [`Procedure`](crate::Procedure) without implementing the
//! trait by hand: a closure that receives every resumption ([`from_fn`]), or an
//! `async` body that suspends with `.await` ([`generator`]).

mod func;
mod generator;

pub use func::{FromFn, from_fn};
pub use generator::{Generator, Suspender, generator};
