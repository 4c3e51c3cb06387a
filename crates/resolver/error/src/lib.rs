mod code;

use std::borrow::Cow;

pub use code::*;
use serde::ser::SerializeMap;

pub type GraphqlResult<T> = Result<T, GraphqlError>;

/// User facing GraphQL error. The executor adds the path & location when it writes the
/// error into the response.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphqlError {
    pub message: Cow<'static, str>,
    pub code: ErrorCode,
    // Serialized as a map, but kept as a Vec for efficiency.
    pub extensions: Vec<(Cow<'static, str>, serde_json::Value)>,
}

impl GraphqlError {
    pub fn new(message: impl Into<Cow<'static, str>>, code: ErrorCode) -> Self {
        GraphqlError {
            message: message.into(),
            code,
            extensions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_extensions(
        mut self,
        extensions: impl IntoIterator<Item = (impl Into<Cow<'static, str>>, impl Into<serde_json::Value>)>,
    ) -> Self {
        for (key, value) in extensions {
            self.extensions.push((key.into(), value.into()));
        }
        self
    }

    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        self.extensions
            .iter()
            .find_map(|(name, value)| (name == key).then_some(value))
    }

    // ------------- //
    // Common errors //
    // ------------- //

    pub fn unauthorized() -> Self {
        GraphqlError::new("Not authorized", ErrorCode::Unauthorized)
    }

    pub fn internal_server_error() -> Self {
        GraphqlError::new("Internal server error", ErrorCode::InternalServerError)
    }

    pub fn resolver(message: impl Into<Cow<'static, str>>) -> Self {
        GraphqlError::new(message, ErrorCode::ResolverError)
    }
}

impl std::fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.message.fmt(f)
    }
}

impl std::error::Error for GraphqlError {}

impl serde::Serialize for GraphqlError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        struct Extensions<'a>(&'a GraphqlError);

        impl serde::Serialize for Extensions<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let mut map = serializer.serialize_map(Some(self.0.extensions.len() + 1))?;
                for (key, value) in &self.0.extensions {
                    map.serialize_entry(key, value)?;
                }
                map.serialize_entry("code", &self.0.code)?;
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        if self.code.is_client_facing() {
            map.serialize_entry("message", &self.message)?;
        } else {
            map.serialize_entry("message", "Internal server error")?;
        }
        map.serialize_entry("extensions", &Extensions(self))?;
        map.end()
    }
}
