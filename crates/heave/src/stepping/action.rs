/// Control actions an observer can return from a time-stepping run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// End the run after the current step and return the series so far.
    StopEarly,
}
