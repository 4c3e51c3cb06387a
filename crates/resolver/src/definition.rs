use std::{fmt, sync::Arc};

use crate::{
    arguments::{ArgumentDefinition, ArgumentDefinitions},
    config::{FieldConfig, FieldOptions},
    resolver::FieldResolver,
    validation::Validator,
};

/// `Parent.field`, identifies a field in error messages and logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldCoordinate {
    pub parent_type: String,
    pub field_name: String,
}

impl FieldCoordinate {
    pub fn new(parent_type: impl Into<String>, field_name: impl Into<String>) -> Self {
        FieldCoordinate {
            parent_type: parent_type.into(),
            field_name: field_name.into(),
        }
    }
}

impl fmt::Display for FieldCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.parent_type, self.field_name)
    }
}

/// Everything known about a field at schema build time. It's built once and shared, read-only,
/// by all invocations of the field.
pub struct FieldDefinition<R: FieldResolver> {
    coordinate: FieldCoordinate,
    config: FieldConfig,
    arguments: ArgumentDefinitions<R>,
    validators: Vec<Arc<dyn Validator>>,
    resolver: R,
}

impl<R: FieldResolver> FieldDefinition<R> {
    pub fn builder() -> FieldDefinitionBuilder<R> {
        FieldDefinitionBuilder {
            layers: Vec::new(),
            arguments: ArgumentDefinitions::default(),
            validators: Vec::new(),
        }
    }

    pub fn coordinate(&self) -> &FieldCoordinate {
        &self.coordinate
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn arguments(&self) -> &ArgumentDefinitions<R> {
        &self.arguments
    }

    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<R: FieldResolver> fmt::Debug for FieldDefinition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("coordinate", &self.coordinate)
            .field("config", &self.config)
            .field("arguments", &self.arguments)
            .field("validators", &self.validators.len())
            .finish_non_exhaustive()
    }
}

/// Collects option layers, arguments and validators. A builder can be cloned and extended to
/// define a field inheriting from another one: later option layers and arguments override
/// earlier ones.
pub struct FieldDefinitionBuilder<R: FieldResolver> {
    layers: Vec<FieldOptions>,
    arguments: ArgumentDefinitions<R>,
    validators: Vec<Arc<dyn Validator>>,
}

impl<R: FieldResolver> Clone for FieldDefinitionBuilder<R> {
    fn clone(&self) -> Self {
        FieldDefinitionBuilder {
            layers: self.layers.clone(),
            arguments: self.arguments.clone(),
            validators: self.validators.clone(),
        }
    }
}

impl<R: FieldResolver> FieldDefinitionBuilder<R> {
    #[must_use]
    pub fn options(mut self, options: FieldOptions) -> Self {
        self.layers.push(options);
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: ArgumentDefinition<R>) -> Self {
        self.arguments.insert(argument);
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: impl Validator) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn build(self, coordinate: FieldCoordinate, resolver: R) -> Arc<FieldDefinition<R>> {
        let config = FieldConfig::from_chain(&self.layers);
        tracing::trace!(field = %coordinate, arguments = self.arguments.len(), "built field definition");

        Arc::new(FieldDefinition {
            coordinate,
            config,
            arguments: self.arguments,
            validators: self.validators,
            resolver,
        })
    }
}
