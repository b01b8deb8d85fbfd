/// Outcome of resuming a procedure: either it suspended on a value, or it ran to
/// its end and produced its return value.
///
/// `Step` is the tagged state a [`Procedure`](crate::Procedure) reports after each
/// resumption. A `Yielded` value is what the procedure wants to wait on; a
/// `Complete` value is what it returned.
///
/// # Examples
///
/// ```rust
/// use sans_await::Step;
///
/// let suspended: Step<&str, i32> = Step::Yielded("fetch");
/// let finished: Step<&str, i32> = Step::Complete(3);
///
/// assert!(suspended.is_yielded());
/// assert_eq!(finished.map_complete(|v| v * 2), Step::Complete(6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<Y, R> {
    /// The procedure suspended on this value.
    Yielded(Y),
    /// The procedure finished with this return value.
    Complete(R),
}

impl<Y, R> Step<Y, R> {
    /// Returns `true` if the procedure suspended.
    #[inline]
    pub const fn is_yielded(&self) -> bool {
        matches!(self, Step::Yielded(_))
    }

    /// Returns `true` if the procedure finished.
    #[inline]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Step::Complete(_))
    }

    /// Converts from `Step<Y, R>` to `Option<Y>`, discarding a return value.
    ///
    /// ```rust
    /// use sans_await::Step;
    ///
    /// let x: Step<i32, &str> = Step::Yielded(42);
    /// assert_eq!(x.yielded_value(), Some(42));
    /// ```
    #[inline]
    pub fn yielded_value(self) -> Option<Y> {
        match self {
            Step::Yielded(y) => Some(y),
            Step::Complete(_) => None,
        }
    }

    /// Converts from `Step<Y, R>` to `Option<R>`, discarding a yielded value.
    #[inline]
    pub fn complete_value(self) -> Option<R> {
        match self {
            Step::Yielded(_) => None,
            Step::Complete(r) => Some(r),
        }
    }

    /// Maps the yielded value, leaving a return value untouched.
    ///
    /// ```rust
    /// use sans_await::Step;
    ///
    /// let x: Step<i32, &str> = Step::Yielded(21);
    /// assert_eq!(x.map_yielded(|v| v * 2), Step::Yielded(42));
    /// ```
    #[inline]
    pub fn map_yielded<Y2, F>(self, f: F) -> Step<Y2, R>
    where
        F: FnOnce(Y) -> Y2,
    {
        match self {
            Step::Yielded(y) => Step::Yielded(f(y)),
            Step::Complete(r) => Step::Complete(r),
        }
    }

    /// Maps the return value, leaving a yielded value untouched.
    #[inline]
    pub fn map_complete<R2, F>(self, f: F) -> Step<Y, R2>
    where
        F: FnOnce(R) -> R2,
    {
        match self {
            Step::Yielded(y) => Step::Yielded(y),
            Step::Complete(r) => Step::Complete(f(r)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yielded_and_is_complete() {
        let y: Step<i32, &str> = Step::Yielded(42);
        let r: Step<i32, &str> = Step::Complete("done");

        assert!(y.is_yielded());
        assert!(!y.is_complete());
        assert!(r.is_complete());
        assert!(!r.is_yielded());
    }

    #[test]
    fn test_value_accessors() {
        let y: Step<i32, &str> = Step::Yielded(42);
        let r: Step<i32, &str> = Step::Complete("done");

        assert_eq!(y.yielded_value(), Some(42));
        assert_eq!(y.complete_value(), None);
        assert_eq!(r.yielded_value(), None);
        assert_eq!(r.complete_value(), Some("done"));
    }

    #[test]
    fn test_maps_touch_only_their_side() {
        let y: Step<i32, i32> = Step::Yielded(4);
        let r: Step<i32, i32> = Step::Complete(10);

        assert_eq!(y.map_yielded(|x| x + 1), Step::Yielded(5));
        assert_eq!(y.map_complete(|x| x + 1), Step::Yielded(4));
        assert_eq!(r.map_yielded(|x| x + 1), Step::Complete(10));
        assert_eq!(r.map_complete(|x| x + 1), Step::Complete(11));
    }
}
