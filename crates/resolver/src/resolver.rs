use deferred::Deferred;
use error::GraphqlError;
use serde_json::Value;

use crate::{
    arguments::{PreparedArguments, RawArguments},
    context::ResolverContext,
    errors::{LoadApplicationObjectFailedError, ResolveError, UnauthorizedObjectError},
    gate::HookReturn,
};

/// Output of the `ready` and `authorized` hooks, checked with [`HookReturn::into_gate`].
pub type HookResult = Deferred<Result<HookReturn, GraphqlError>>;

pub type ResolveResult = Deferred<Result<Value, GraphqlError>>;

/// User logic of a field. Only `resolve` is mandatory, every hook defaults to letting the call
/// through.
///
/// Hooks must not block: anything that isn't known right away is returned as a pending
/// [`Deferred`] and the pipeline continues once it completes.
pub trait FieldResolver: Send + Sync + Sized + 'static {
    /// Parent value the field is resolved on.
    type Object: Send + Sync + 'static;
    /// Request-scoped context.
    type Context: Send + Sync + 'static;

    /// Runs before anything else, with the raw arguments. `false` resolves the field to `null`
    /// without loading arguments, `(false, value)` resolves it to `value`.
    fn ready(&self, ctx: &ResolverContext<Self>, arguments: &RawArguments) -> HookResult {
        let _ = (ctx, arguments);
        Deferred::Ready(Ok(HookReturn::pass()))
    }

    /// Whole-call authorization, after the per-argument checks. `false` raises an
    /// [`UnauthorizedFieldError`](crate::UnauthorizedFieldError), `(false, value)` resolves
    /// the field to `value`.
    fn authorized(&self, ctx: &ResolverContext<Self>, arguments: &PreparedArguments) -> HookResult {
        let _ = (ctx, arguments);
        Deferred::Ready(Ok(HookReturn::pass()))
    }

    fn resolve(&self, ctx: &ResolverContext<Self>, arguments: &PreparedArguments) -> ResolveResult;

    /// Called when an object loaded for an argument fails its own authorization. The returned
    /// value replaces the loaded object, the default raises the error.
    fn unauthorized_object(
        &self,
        ctx: &ResolverContext<Self>,
        error: UnauthorizedObjectError,
    ) -> Deferred<Result<Value, ResolveError>> {
        let _ = ctx;
        Deferred::Ready(Err(error.into()))
    }

    /// Called when no object matches an argument id. The returned value replaces the missing
    /// object, the default raises the error.
    fn load_application_object_failed(
        &self,
        ctx: &ResolverContext<Self>,
        error: LoadApplicationObjectFailedError,
    ) -> Deferred<Result<Value, ResolveError>> {
        let _ = ctx;
        Deferred::Ready(Err(error.into()))
    }
}
