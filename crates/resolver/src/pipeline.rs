use std::sync::Arc;

use deferred::Deferred;
use serde_json::Value;

use crate::{
    arguments::{self, PreparedArguments},
    authorization::{self, into_gate},
    context::{Invocation, ResolverContext},
    definition::FieldDefinition,
    errors::ResolveError,
    gate::{Gate, HookKind},
    resolver::FieldResolver,
    validation,
};

/// One resolution of a field. Stages run in order: readiness, argument loading, validation,
/// authorization and finally the resolver. Each stage continues inline when the previous one
/// completed right away, and is registered as a continuation otherwise.
pub struct FieldResolution<R: FieldResolver> {
    ctx: ResolverContext<R>,
}

impl<R: FieldResolver> FieldResolution<R> {
    pub fn new(field: Arc<FieldDefinition<R>>, invocation: Invocation<R>) -> Self {
        FieldResolution {
            ctx: ResolverContext::new(field, invocation),
        }
    }

    pub fn context(&self) -> &ResolverContext<R> {
        &self.ctx
    }

    /// Fails with [`ResolveError::ArgumentsNotLoaded`] until argument loading completed.
    pub fn prepared_arguments(&self) -> Result<&PreparedArguments, ResolveError> {
        self.ctx.prepared_arguments()
    }

    /// The result is only ready if every stage was. Dropping it stops the resolution.
    pub fn resolve(&self) -> Deferred<Result<Value, ResolveError>> {
        let span = tracing::debug_span!("resolve_field", field = %self.ctx.coordinate());

        span.in_scope(|| readiness(&self.ctx)).in_span(span)
    }
}

fn readiness<R: FieldResolver>(ctx: &ResolverContext<R>) -> Deferred<Result<Value, ResolveError>> {
    let check = ctx.resolver().ready(ctx, ctx.arguments());
    let ctx = ctx.clone();

    check.then(move |output| match into_gate(&ctx, HookKind::Ready, output) {
        Ok(Gate::Pass) => load(&ctx),
        Ok(Gate::Fail) => {
            tracing::debug!("field is not ready, resolving to null");
            Deferred::Ready(Ok(Value::Null))
        }
        Ok(Gate::FailWith(value)) => {
            tracing::debug!("field is not ready, returning early");
            Deferred::Ready(Ok(value))
        }
        Err(err) => Deferred::Ready(Err(err)),
    })
}

fn load<R: FieldResolver>(ctx: &ResolverContext<R>) -> Deferred<Result<Value, ResolveError>> {
    let loaded = arguments::load_arguments(ctx);
    let ctx = ctx.clone();

    loaded.and_then(move |prepared| {
        ctx.set_prepared_arguments(prepared);

        let validated = match ctx.prepared_arguments() {
            Ok(arguments) => validation::validate(&ctx, arguments).map_err(ResolveError::from),
            Err(err) => Err(err),
        };

        match validated {
            Ok(()) => authorize(&ctx),
            Err(err) => Deferred::Ready(Err(err)),
        }
    })
}

fn authorize<R: FieldResolver>(ctx: &ResolverContext<R>) -> Deferred<Result<Value, ResolveError>> {
    let authorized = authorization::authorize(ctx);
    let ctx = ctx.clone();

    authorized.and_then(move |gate| match gate {
        Gate::Pass => resolve(&ctx),
        Gate::FailWith(value) => {
            tracing::debug!("authorization returned early");
            Deferred::Ready(Ok(value))
        }
        // Plain denials are already errors at this point.
        Gate::Fail => Deferred::Ready(Err(ctx.unauthorized().into())),
    })
}

fn resolve<R: FieldResolver>(ctx: &ResolverContext<R>) -> Deferred<Result<Value, ResolveError>> {
    match ctx.prepared_arguments() {
        Ok(arguments) => ctx.resolver().resolve(ctx, arguments).map_err(ResolveError::from),
        Err(err) => Deferred::Ready(Err(err)),
    }
}
