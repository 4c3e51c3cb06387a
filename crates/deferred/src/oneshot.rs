use futures::{channel::oneshot as channel, FutureExt};

pub use futures::channel::oneshot::Canceled;

use crate::Deferred;

/// Completes the value returned alongside it by [`oneshot`]. This is the handle a scheduler
/// keeps once it has batched the work behind a deferred value.
#[derive(Debug)]
pub struct Completer<T>(channel::Sender<T>);

impl<T> Completer<T> {
    /// Returns `false` if nobody is waiting on the value anymore.
    pub fn complete(self, value: T) -> bool {
        self.0.send(value).is_ok()
    }

    pub fn is_canceled(&self) -> bool {
        self.0.is_canceled()
    }
}

/// A pending value and the handle to complete it. Dropping the handle without completing
/// resolves the value to [`Canceled`].
pub fn oneshot<T: Send + 'static>() -> (Completer<T>, Deferred<Result<T, Canceled>>) {
    let (sender, receiver) = channel::channel();
    (Completer(sender), Deferred::Pending(receiver.boxed()))
}
