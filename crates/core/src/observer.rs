/// Watches a running simulation one event at a time.
///
/// A time-stepping run hands its observer an event after every accepted step,
/// carrying the step index, the time, the current domain and stress field.
/// Returning `Some(action)` asks the run to act on it (stopping after the
/// observed step, for instance); `None` keeps the run going.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, so a run can be
/// watched by a closure that pushes lens positions into a `Vec`. Passing `()`
/// watches nothing.
pub trait Observer<E, A> {
    /// Inspects `event` and optionally requests `A`.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
