use std::{any::Any, fmt, sync::Arc};

use error::{ErrorCode, GraphqlError};
use serde_json::Value;

use crate::{definition::FieldCoordinate, gate::HookKind};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Prepared arguments were read before argument loading completed. This is a bug in the
    /// calling code, not a request failure.
    #[error("Arguments of `{0}` have not been prepared yet, argument loading is still in progress")]
    ArgumentsNotLoaded(FieldCoordinate),
    #[error(transparent)]
    Unauthorized(#[from] UnauthorizedFieldError),
    #[error(transparent)]
    UnauthorizedObject(#[from] UnauthorizedObjectError),
    #[error(transparent)]
    LoadApplicationObjectFailed(#[from] LoadApplicationObjectFailedError),
    #[error("Unexpected result from the `{hook}` hook of `{field}` (expected `true`, `false` or `[false, value]`): {output}")]
    MalformedHook {
        field: FieldCoordinate,
        hook: HookKind,
        output: Value,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Could not prepare argument `{keyword}`: {source}")]
    Argument { keyword: String, source: GraphqlError },
    /// Raised by the resolution logic or one of its hooks, propagated as is.
    #[error(transparent)]
    Graphql(#[from] GraphqlError),
}

impl ResolveError {
    pub(crate) fn argument(keyword: impl Into<String>, source: GraphqlError) -> Self {
        ResolveError::Argument {
            keyword: keyword.into(),
            source,
        }
    }

    /// Usage and malformed hook errors are defects of the schema code rather than something
    /// the client did.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            ResolveError::ArgumentsNotLoaded(_) | ResolveError::MalformedHook { .. }
        )
    }
}

impl From<ResolveError> for GraphqlError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::ArgumentsNotLoaded(_) | ResolveError::MalformedHook { .. } => {
                GraphqlError::new(err.to_string(), ErrorCode::InternalServerError)
            }
            ResolveError::Unauthorized(err) => err.into(),
            ResolveError::UnauthorizedObject(err) => GraphqlError::new(err.to_string(), ErrorCode::Unauthorized)
                .with_extension("argument", err.keyword),
            ResolveError::LoadApplicationObjectFailed(err) => {
                GraphqlError::new(err.to_string(), ErrorCode::NotFound).with_extension("argument", err.keyword)
            }
            ResolveError::Validation(err) => GraphqlError::new(err.to_string(), ErrorCode::ValidationError)
                .with_extension("field", err.field.to_string()),
            ResolveError::Argument { keyword, source } => source.with_extension("argument", keyword),
            ResolveError::Graphql(err) => err,
        }
    }
}

/// Raised when the field's authorization, or one of its arguments', denies access without
/// providing a substitute value.
#[derive(Clone, thiserror::Error)]
#[error("Not authorized to access `{field}`")]
pub struct UnauthorizedFieldError {
    field: FieldCoordinate,
    argument: Option<String>,
    object: Arc<dyn Any + Send + Sync>,
    context: Arc<dyn Any + Send + Sync>,
}

impl UnauthorizedFieldError {
    pub(crate) fn new(
        field: FieldCoordinate,
        object: Arc<dyn Any + Send + Sync>,
        context: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        UnauthorizedFieldError {
            field,
            argument: None,
            object,
            context,
        }
    }

    #[must_use]
    pub(crate) fn with_argument(mut self, keyword: impl Into<String>) -> Self {
        self.argument = Some(keyword.into());
        self
    }

    pub fn field(&self) -> &FieldCoordinate {
        &self.field
    }

    /// Set when a per-argument check denied access.
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    pub fn object<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref()
    }

    pub fn context<T: Any>(&self) -> Option<&T> {
        self.context.downcast_ref()
    }
}

impl fmt::Debug for UnauthorizedFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnauthorizedFieldError")
            .field("field", &self.field)
            .field("argument", &self.argument)
            .finish_non_exhaustive()
    }
}

impl From<UnauthorizedFieldError> for GraphqlError {
    fn from(err: UnauthorizedFieldError) -> Self {
        let error = GraphqlError::unauthorized().with_extension("field", err.field.to_string());
        match err.argument {
            Some(keyword) => error.with_extension("argument", keyword),
            None => error,
        }
    }
}

/// A loaded argument object failed the authorization of its own type.
#[derive(Debug, Clone, thiserror::Error)]
#[error("The `{type_name}` loaded for argument `{keyword}` of `{field}` failed its authorization check")]
pub struct UnauthorizedObjectError {
    pub field: FieldCoordinate,
    pub keyword: String,
    pub type_name: String,
    pub object: Value,
}

/// An argument id didn't match any application object.
#[derive(Debug, Clone, thiserror::Error)]
#[error("No `{type_name}` found for `{keyword}: {id}`")]
pub struct LoadApplicationObjectFailedError {
    pub field: FieldCoordinate,
    pub keyword: String,
    pub type_name: String,
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", .messages.join(", "))]
pub struct ValidationError {
    pub field: FieldCoordinate,
    pub messages: Vec<String>,
}
