use std::sync::{Arc, OnceLock};

use crate::{
    arguments::{PreparedArguments, RawArguments},
    definition::{FieldCoordinate, FieldDefinition},
    errors::{ResolveError, UnauthorizedFieldError},
    resolver::FieldResolver,
};

/// One call of a field, as handed over by the executor.
pub struct Invocation<R: FieldResolver> {
    pub object: Arc<R::Object>,
    pub context: Arc<R::Context>,
    pub arguments: RawArguments,
}

impl<R: FieldResolver> Invocation<R> {
    pub fn new(object: Arc<R::Object>, context: Arc<R::Context>, arguments: RawArguments) -> Self {
        Invocation {
            object,
            context,
            arguments,
        }
    }
}

/// Per-invocation view given to every hook. Cloning it is cheap and clones share the same
/// invocation state, so a hook can move one into its deferred value.
pub struct ResolverContext<R: FieldResolver> {
    inner: Arc<InvocationState<R>>,
}

struct InvocationState<R: FieldResolver> {
    field: Arc<FieldDefinition<R>>,
    object: Arc<R::Object>,
    context: Arc<R::Context>,
    arguments: RawArguments,
    prepared: OnceLock<PreparedArguments>,
}

impl<R: FieldResolver> Clone for ResolverContext<R> {
    fn clone(&self) -> Self {
        ResolverContext {
            inner: self.inner.clone(),
        }
    }
}

impl<R: FieldResolver> ResolverContext<R> {
    pub(crate) fn new(field: Arc<FieldDefinition<R>>, invocation: Invocation<R>) -> Self {
        let Invocation {
            object,
            context,
            arguments,
        } = invocation;

        ResolverContext {
            inner: Arc::new(InvocationState {
                field,
                object,
                context,
                arguments,
                prepared: OnceLock::new(),
            }),
        }
    }

    pub fn object(&self) -> &Arc<R::Object> {
        &self.inner.object
    }

    pub fn context(&self) -> &Arc<R::Context> {
        &self.inner.context
    }

    pub fn field(&self) -> &FieldDefinition<R> {
        &self.inner.field
    }

    pub fn coordinate(&self) -> &FieldCoordinate {
        self.inner.field.coordinate()
    }

    pub fn resolver(&self) -> &R {
        self.inner.field.resolver()
    }

    /// Raw values as received, before any loading.
    pub fn arguments(&self) -> &RawArguments {
        &self.inner.arguments
    }

    /// Loaded and prepared arguments. Only available once argument loading completed,
    /// reading them any earlier is a usage error.
    pub fn prepared_arguments(&self) -> Result<&PreparedArguments, ResolveError> {
        self.inner
            .prepared
            .get()
            .ok_or_else(|| ResolveError::ArgumentsNotLoaded(self.coordinate().clone()))
    }

    pub(crate) fn set_prepared_arguments(&self, arguments: PreparedArguments) {
        if self.inner.prepared.set(arguments).is_err() {
            tracing::error!(field = %self.coordinate(), "arguments were prepared twice for the same invocation");
        }
    }

    pub(crate) fn unauthorized(&self) -> UnauthorizedFieldError {
        UnauthorizedFieldError::new(
            self.coordinate().clone(),
            self.inner.object.clone(),
            self.inner.context.clone(),
        )
    }
}
