//! Commonly used imports
//!
//! Use `use sans_await::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{Awaitable, IntoAwaitable, Procedure, Resume, Step};

// Building procedures
pub use crate::build::{Suspender, from_fn, generator};

// Driving
pub use crate::{Coroutine, DriverConfig, coroutine};

// Collaborators
pub use crate::{Promise, Queue, Scheduler};

// Errors
pub use crate::{SettleError, UnexpectedYield};
