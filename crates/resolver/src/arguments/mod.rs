mod loader;
mod loads;

use std::{fmt, sync::Arc};

use deferred::Deferred;
use error::GraphqlError;
use heck::ToSnakeCase;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{context::ResolverContext, errors::ResolveError, resolver::FieldResolver, HookResult};

pub(crate) use loader::load_arguments;

/// Arguments as received, extras included, keyed by keyword.
pub type RawArguments = IndexMap<String, Value>;

type PrepareFn<R> = dyn Fn(&ResolverContext<R>, Value) -> Deferred<Result<Value, GraphqlError>> + Send + Sync;
type AuthorizeFn<R> = dyn Fn(&ResolverContext<R>, &Value) -> HookResult + Send + Sync;

/// Arguments after loading, in the same order as the raw ones.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct PreparedArguments(IndexMap<String, Value>);

impl PreparedArguments {
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        self.0.get(keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.contains_key(keyword)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(keyword, value)| (keyword.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.0
    }

    /// Reads all arguments into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let object = self
            .0
            .iter()
            .map(|(keyword, value)| (keyword.clone(), value.clone()))
            .collect();

        serde_json::from_value(Value::Object(object))
    }
}

impl FromIterator<(String, Value)> for PreparedArguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        PreparedArguments(iter.into_iter().collect())
    }
}

/// Fetches application objects from the ids given as argument values.
pub trait ObjectLoader<R: FieldResolver>: Send + Sync + 'static {
    /// Name of the loaded type, used in errors.
    fn type_name(&self) -> &str;

    /// `None` when nothing matches `id`.
    fn load(&self, ctx: &ResolverContext<R>, id: &Value) -> Deferred<Result<Option<Value>, GraphqlError>>;

    /// Authorization of the loaded type itself.
    fn authorized(&self, ctx: &ResolverContext<R>, object: &Value) -> Deferred<Result<bool, GraphqlError>> {
        let _ = (ctx, object);
        Deferred::Ready(Ok(true))
    }
}

/// Declaration of a single argument.
pub struct ArgumentDefinition<R: FieldResolver> {
    name: String,
    keyword: String,
    ty: String,
    default_value: Option<Value>,
    description: Option<String>,
    prepare: Option<Arc<PrepareFn<R>>>,
    loads: Option<Arc<dyn ObjectLoader<R>>>,
    authorize: Option<Arc<AuthorizeFn<R>>>,
}

impl<R: FieldResolver> ArgumentDefinition<R> {
    /// `name` is the name exposed in the schema, the keyword defaults to its snake case form.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        let name = name.into();

        ArgumentDefinition {
            keyword: name.to_snake_case(),
            name,
            ty: ty.into(),
            default_value: None,
            description: None,
            prepare: None,
            loads: None,
            authorize: None,
        }
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    #[must_use]
    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Transforms the raw value before it's loaded.
    #[must_use]
    pub fn prepare<F>(mut self, prepare: F) -> Self
    where
        F: Fn(&ResolverContext<R>, Value) -> Deferred<Result<Value, GraphqlError>> + Send + Sync + 'static,
    {
        self.prepare = Some(Arc::new(prepare));
        self
    }

    /// Treats the value as the id of an application object, or a list of ids for list types.
    #[must_use]
    pub fn loads(mut self, loader: impl ObjectLoader<R>) -> Self {
        self.loads = Some(Arc::new(loader));
        self
    }

    /// Per-argument authorization. Only called with explicit values, never with `null` or
    /// the default value.
    #[must_use]
    pub fn authorize<F>(mut self, authorize: F) -> Self
    where
        F: Fn(&ResolverContext<R>, &Value) -> HookResult + Send + Sync + 'static,
    {
        self.authorize = Some(Arc::new(authorize));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_list(&self) -> bool {
        self.ty.starts_with('[')
    }

    pub fn has_authorization(&self) -> bool {
        self.authorize.is_some()
    }

    pub(crate) fn run_authorize(&self, ctx: &ResolverContext<R>, value: &Value) -> Option<HookResult> {
        self.authorize.as_ref().map(|authorize| authorize(ctx, value))
    }

    /// Turns a raw value into its prepared form: `prepare`, then object loading and the
    /// loaded object's authorization. `null` is returned as is without running anything.
    pub fn load_and_authorize(&self, ctx: &ResolverContext<R>, value: Value) -> Deferred<Result<Value, ResolveError>> {
        if value.is_null() {
            return Deferred::Ready(Ok(Value::Null));
        }

        let prepared = match &self.prepare {
            Some(prepare) => {
                let keyword = self.keyword.clone();
                prepare(ctx, value).map_err(move |err| ResolveError::argument(keyword, err))
            }
            None => Deferred::Ready(Ok(value)),
        };

        let Some(loader) = self.loads.clone() else {
            return prepared;
        };

        let ctx = ctx.clone();
        let keyword = self.keyword.clone();
        let is_list = self.is_list();

        prepared.and_then(move |value| loads::load_objects(&ctx, &loader, &keyword, is_list, value))
    }
}

impl<R: FieldResolver> Clone for ArgumentDefinition<R> {
    fn clone(&self) -> Self {
        ArgumentDefinition {
            name: self.name.clone(),
            keyword: self.keyword.clone(),
            ty: self.ty.clone(),
            default_value: self.default_value.clone(),
            description: self.description.clone(),
            prepare: self.prepare.clone(),
            loads: self.loads.clone(),
            authorize: self.authorize.clone(),
        }
    }
}

impl<R: FieldResolver> fmt::Debug for ArgumentDefinition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentDefinition")
            .field("name", &self.name)
            .field("keyword", &self.keyword)
            .field("ty", &self.ty)
            .field("default_value", &self.default_value)
            .field("loads", &self.loads.as_ref().map(|loader| loader.type_name().to_owned()))
            .field("authorize", &self.authorize.is_some())
            .finish_non_exhaustive()
    }
}

/// Arguments of a field in declaration order, keyed by keyword.
pub struct ArgumentDefinitions<R: FieldResolver>(IndexMap<String, ArgumentDefinition<R>>);

impl<R: FieldResolver> ArgumentDefinitions<R> {
    /// An argument with an already declared keyword replaces it, keeping its position.
    pub fn insert(&mut self, argument: ArgumentDefinition<R>) {
        self.0.insert(argument.keyword.clone(), argument);
    }

    pub fn get(&self, keyword: &str) -> Option<&ArgumentDefinition<R>> {
        self.0.get(keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArgumentDefinition<R>> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<R: FieldResolver> Default for ArgumentDefinitions<R> {
    fn default() -> Self {
        ArgumentDefinitions(IndexMap::new())
    }
}

impl<R: FieldResolver> Clone for ArgumentDefinitions<R> {
    fn clone(&self) -> Self {
        ArgumentDefinitions(self.0.clone())
    }
}

impl<R: FieldResolver> fmt::Debug for ArgumentDefinitions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.values()).finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::ResolveResult;

    struct Noop;

    impl FieldResolver for Noop {
        type Object = ();
        type Context = ();

        fn resolve(&self, _: &ResolverContext<Self>, _: &PreparedArguments) -> ResolveResult {
            Deferred::Ready(Ok(Value::Null))
        }
    }

    #[test]
    fn keyword_defaults_to_snake_case() {
        let argument = ArgumentDefinition::<Noop>::new("postId", "ID!");

        assert_eq!(argument.name(), "postId");
        assert_eq!(argument.keyword(), "post_id");
        assert!(!argument.is_list());

        let argument = argument.with_keyword("id");
        assert_eq!(argument.keyword(), "id");
    }

    #[test]
    fn list_types() {
        assert!(ArgumentDefinition::<Noop>::new("ids", "[ID!]!").is_list());
        assert!(ArgumentDefinition::<Noop>::new("ids", "[ID]").is_list());
    }

    #[test]
    fn redefinition_keeps_position() {
        let mut arguments = ArgumentDefinitions::<Noop>::default();
        arguments.insert(ArgumentDefinition::new("first", "Int"));
        arguments.insert(ArgumentDefinition::new("after", "String"));
        arguments.insert(ArgumentDefinition::new("first", "Int!").with_default_value(10));

        let declared = arguments
            .iter()
            .map(|argument| (argument.keyword(), argument.ty()))
            .collect::<Vec<_>>();

        assert_eq!(declared, vec![("first", "Int!"), ("after", "String")]);
        assert_eq!(arguments.get("first").and_then(ArgumentDefinition::default_value), Some(&json!(10)));
    }

    #[test]
    fn prepared_arguments_into_struct() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Input {
            title: String,
            limit: Option<u32>,
        }

        let arguments: PreparedArguments = [("title".to_owned(), json!("Hello")), ("limit".to_owned(), json!(3))]
            .into_iter()
            .collect();

        assert_eq!(
            arguments.deserialize::<Input>().unwrap(),
            Input {
                title: "Hello".into(),
                limit: Some(3)
            }
        );
        assert_eq!(arguments.keys().collect::<Vec<_>>(), vec!["title", "limit"]);
    }
}
