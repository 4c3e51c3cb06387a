//! A value that is either available right away or completed later by whoever drives the
//! request (an executor, a batching scheduler...).
//!
//! Nothing in here ever blocks or spawns. Registering a continuation on a pending value with
//! [`Deferred::then`] returns immediately with a new pending value, and continuations may
//! themselves return pending values which are flattened. A chain of ready values never
//! allocates.

mod join;
mod oneshot;

use std::{fmt, future::IntoFuture};

use futures::future::{self, BoxFuture, Either, FutureExt};
use tracing::Instrument;

pub use join::{join_all, try_join_all};
pub use oneshot::{oneshot, Canceled, Completer};

/// Either an immediate value or one that will only be known once its future is driven to
/// completion.
#[must_use]
pub enum Deferred<T> {
    Ready(T),
    Pending(BoxFuture<'static, T>),
}

impl<T: Send + 'static> Deferred<T> {
    pub fn pending(future: impl std::future::Future<Output = T> + Send + 'static) -> Self {
        Deferred::Pending(future.boxed())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Deferred::Pending(_))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Deferred::Ready(_))
    }

    /// Returns the value if it is already available, or gives back the pending value.
    pub fn into_ready(self) -> Result<T, Self> {
        match self {
            Deferred::Ready(value) => Ok(value),
            pending => Err(pending),
        }
    }

    /// Registers `f` to run once the value is available. A ready value runs `f` inline, a
    /// pending one only once it completes. Whatever `f` returns, ready or not, is flattened
    /// into the result.
    pub fn then<U, F>(self, f: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Deferred<U> + Send + 'static,
    {
        match self {
            Deferred::Ready(value) => f(value),
            Deferred::Pending(future) => Deferred::pending(async move { f(future.await).await }),
        }
    }

    pub fn map<U, F>(self, f: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        match self {
            Deferred::Ready(value) => Deferred::Ready(f(value)),
            Deferred::Pending(future) => Deferred::Pending(future.map(f).boxed()),
        }
    }

    /// Pending values are polled inside `span`, ready ones are left untouched.
    pub fn in_span(self, span: tracing::Span) -> Self {
        match self {
            Deferred::Pending(future) => Deferred::Pending(future.instrument(span).boxed()),
            ready => ready,
        }
    }
}

impl<T, E> Deferred<Result<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Like [`Deferred::then`], but only for a successful value. Errors are carried through
    /// without calling `f`.
    pub fn and_then<U, F>(self, f: F) -> Deferred<Result<U, E>>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Deferred<Result<U, E>> + Send + 'static,
    {
        self.then(|result| match result {
            Ok(value) => f(value),
            Err(err) => Deferred::Ready(Err(err)),
        })
    }

    pub fn map_ok<U, F>(self, f: F) -> Deferred<Result<U, E>>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.map(|result| result.map(f))
    }

    pub fn map_err<E2, F>(self, f: F) -> Deferred<Result<T, E2>>
    where
        E2: Send + 'static,
        F: FnOnce(E) -> E2 + Send + 'static,
    {
        self.map(|result| result.map_err(f))
    }
}

impl<T> From<T> for Deferred<T> {
    fn from(value: T) -> Self {
        Deferred::Ready(value)
    }
}

impl<T: Send + 'static> IntoFuture for Deferred<T> {
    type Output = T;
    type IntoFuture = Either<future::Ready<T>, BoxFuture<'static, T>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Deferred::Ready(value) => Either::Left(future::ready(value)),
            Deferred::Pending(future) => Either::Right(future),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferred::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Deferred::Pending(_) => f.write_str("Pending"),
        }
    }
}
