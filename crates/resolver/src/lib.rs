//! Resolution of a single field: readiness, argument loading, validation and authorization run
//! in a fixed order before the user resolution logic. Every stage may complete right away or
//! later through a [`Deferred`] value, the pipeline never blocks waiting for one.

mod arguments;
mod authorization;
mod config;
mod context;
mod definition;
mod errors;
mod gate;
mod pipeline;
mod resolver;
pub mod validation;

pub use arguments::{ArgumentDefinition, ArgumentDefinitions, ObjectLoader, PreparedArguments, RawArguments};
pub use config::{FieldConfig, FieldOptions};
pub use context::{Invocation, ResolverContext};
pub use deferred::Deferred;
pub use definition::{FieldCoordinate, FieldDefinition, FieldDefinitionBuilder};
pub use error::{ErrorCode, GraphqlError, GraphqlResult};
pub use errors::{
    LoadApplicationObjectFailedError, ResolveError, UnauthorizedFieldError, UnauthorizedObjectError, ValidationError,
};
pub use gate::{Gate, HookKind, HookReturn};
pub use pipeline::FieldResolution;
pub use resolver::{FieldResolver, HookResult, ResolveResult};
