//! Argument validators, run once arguments are prepared and before authorization.
//!
//! All validators of a field run, their messages are collected into a single
//! [`ValidationError`]. Apart from [`Required`], [`AllowNull`] and [`AllowBlank`], validators
//! ignore absent and `null` arguments.

use regex::Regex;
use serde_json::Value;

use crate::{
    arguments::PreparedArguments, config::FieldConfig, context::ResolverContext, errors::ValidationError,
    resolver::FieldResolver,
};

pub trait Validator: Send + Sync + 'static {
    /// Returns the message to show the client when the arguments are rejected.
    fn validate(&self, arguments: &PreparedArguments, config: &FieldConfig) -> Result<(), String>;
}

impl<F> Validator for F
where
    F: Fn(&PreparedArguments, &FieldConfig) -> Result<(), String> + Send + Sync + 'static,
{
    fn validate(&self, arguments: &PreparedArguments, config: &FieldConfig) -> Result<(), String> {
        self(arguments, config)
    }
}

pub(crate) fn validate<R: FieldResolver>(
    ctx: &ResolverContext<R>,
    arguments: &PreparedArguments,
) -> Result<(), ValidationError> {
    let config = ctx.field().config();
    let messages = ctx
        .field()
        .validators()
        .iter()
        .filter_map(|validator| validator.validate(arguments, config).err())
        .collect::<Vec<_>>();

    if messages.is_empty() {
        return Ok(());
    }

    tracing::debug!(field = %ctx.coordinate(), errors = messages.len(), "arguments failed validation");

    Err(ValidationError {
        field: ctx.coordinate().clone(),
        messages,
    })
}

fn present<'a>(arguments: &'a PreparedArguments, keyword: &str) -> Option<&'a Value> {
    arguments.get(keyword).filter(|value| !value.is_null())
}

/// Exactly one of the given arguments must be present and non-null.
#[derive(Debug, Clone)]
pub struct Required {
    one_of: Vec<String>,
}

impl Required {
    pub fn argument(keyword: impl Into<String>) -> Self {
        Required {
            one_of: vec![keyword.into()],
        }
    }

    pub fn one_of<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Required {
            one_of: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for Required {
    fn validate(&self, arguments: &PreparedArguments, _: &FieldConfig) -> Result<(), String> {
        let given = self
            .one_of
            .iter()
            .filter(|keyword| present(arguments, keyword).is_some())
            .count();

        match (given, self.one_of.as_slice()) {
            (1, _) => Ok(()),
            (_, [keyword]) => Err(format!("{keyword} is required")),
            _ => Err(format!("exactly one of {} is required", self.one_of.join(", "))),
        }
    }
}

/// Length of a string, in characters, or of a list.
#[derive(Debug, Clone)]
pub struct Length {
    keyword: String,
    minimum: Option<usize>,
    maximum: Option<usize>,
    is: Option<usize>,
}

impl Length {
    pub fn new(keyword: impl Into<String>) -> Self {
        Length {
            keyword: keyword.into(),
            minimum: None,
            maximum: None,
            is: None,
        }
    }

    #[must_use]
    pub fn minimum(mut self, minimum: usize) -> Self {
        self.minimum = Some(minimum);
        self
    }

    #[must_use]
    pub fn maximum(mut self, maximum: usize) -> Self {
        self.maximum = Some(maximum);
        self
    }

    #[must_use]
    pub fn is(mut self, length: usize) -> Self {
        self.is = Some(length);
        self
    }
}

impl Validator for Length {
    fn validate(&self, arguments: &PreparedArguments, _: &FieldConfig) -> Result<(), String> {
        let length = match present(arguments, &self.keyword) {
            Some(Value::String(s)) => s.chars().count(),
            Some(Value::Array(items)) => items.len(),
            _ => return Ok(()),
        };

        let keyword = &self.keyword;

        if let Some(is) = self.is.filter(|is| *is != length) {
            return Err(format!("{keyword} is the wrong length (should be {is})"));
        }

        if let Some(minimum) = self.minimum.filter(|minimum| length < *minimum) {
            return Err(format!("{keyword} is too short (minimum is {minimum})"));
        }

        if let Some(maximum) = self.maximum.filter(|maximum| length > *maximum) {
            return Err(format!("{keyword} is too long (maximum is {maximum})"));
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Numericality {
    keyword: String,
    greater_than: Option<f64>,
    greater_than_or_equal_to: Option<f64>,
    less_than: Option<f64>,
    less_than_or_equal_to: Option<f64>,
    equal_to: Option<f64>,
}

impl Numericality {
    pub fn new(keyword: impl Into<String>) -> Self {
        Numericality {
            keyword: keyword.into(),
            greater_than: None,
            greater_than_or_equal_to: None,
            less_than: None,
            less_than_or_equal_to: None,
            equal_to: None,
        }
    }

    #[must_use]
    pub fn greater_than(mut self, bound: f64) -> Self {
        self.greater_than = Some(bound);
        self
    }

    #[must_use]
    pub fn greater_than_or_equal_to(mut self, bound: f64) -> Self {
        self.greater_than_or_equal_to = Some(bound);
        self
    }

    #[must_use]
    pub fn less_than(mut self, bound: f64) -> Self {
        self.less_than = Some(bound);
        self
    }

    #[must_use]
    pub fn less_than_or_equal_to(mut self, bound: f64) -> Self {
        self.less_than_or_equal_to = Some(bound);
        self
    }

    #[must_use]
    pub fn equal_to(mut self, bound: f64) -> Self {
        self.equal_to = Some(bound);
        self
    }
}

impl Validator for Numericality {
    fn validate(&self, arguments: &PreparedArguments, _: &FieldConfig) -> Result<(), String> {
        let Some(value) = present(arguments, &self.keyword) else {
            return Ok(());
        };

        let keyword = &self.keyword;
        let Some(number) = value.as_f64() else {
            return Err(format!("{keyword} must be a number"));
        };

        let checks: [(Option<f64>, fn(f64, f64) -> bool, &str); 5] = [
            (self.greater_than, |n, bound| n > bound, "greater than"),
            (self.greater_than_or_equal_to, |n, bound| n >= bound, "greater than or equal to"),
            (self.less_than, |n, bound| n < bound, "less than"),
            (self.less_than_or_equal_to, |n, bound| n <= bound, "less than or equal to"),
            (self.equal_to, |n, bound| (n - bound).abs() < f64::EPSILON, "equal to"),
        ];

        for (bound, holds, relation) in checks {
            if let Some(bound) = bound.filter(|bound| !holds(number, *bound)) {
                return Err(format!("{keyword} must be {relation} {bound}"));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Inclusion {
    keyword: String,
    values: Vec<Value>,
}

impl Inclusion {
    pub fn new(keyword: impl Into<String>, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Inclusion {
            keyword: keyword.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for Inclusion {
    fn validate(&self, arguments: &PreparedArguments, _: &FieldConfig) -> Result<(), String> {
        match present(arguments, &self.keyword) {
            Some(value) if !self.values.contains(value) => Err(format!("{} is not included in the list", self.keyword)),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Exclusion {
    keyword: String,
    values: Vec<Value>,
}

impl Exclusion {
    pub fn new(keyword: impl Into<String>, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Exclusion {
            keyword: keyword.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for Exclusion {
    fn validate(&self, arguments: &PreparedArguments, _: &FieldConfig) -> Result<(), String> {
        match present(arguments, &self.keyword) {
            Some(value) if self.values.contains(value) => Err(format!("{} is reserved", self.keyword)),
            _ => Ok(()),
        }
    }
}

/// String arguments must match the pattern.
#[derive(Debug, Clone)]
pub struct Format {
    keyword: String,
    pattern: Regex,
}

impl Format {
    pub fn new(keyword: impl Into<String>, pattern: Regex) -> Self {
        Format {
            keyword: keyword.into(),
            pattern,
        }
    }
}

impl Validator for Format {
    fn validate(&self, arguments: &PreparedArguments, _: &FieldConfig) -> Result<(), String> {
        match present(arguments, &self.keyword) {
            Some(Value::String(s)) if !self.pattern.is_match(s) => Err(format!("{} is invalid", self.keyword)),
            _ => Ok(()),
        }
    }
}

/// Rejects an explicit `null`. An absent argument is fine.
#[derive(Debug, Clone)]
pub struct AllowNull {
    keyword: String,
    allow: bool,
}

impl AllowNull {
    pub fn new(keyword: impl Into<String>, allow: bool) -> Self {
        AllowNull {
            keyword: keyword.into(),
            allow,
        }
    }
}

impl Validator for AllowNull {
    fn validate(&self, arguments: &PreparedArguments, _: &FieldConfig) -> Result<(), String> {
        match arguments.get(&self.keyword) {
            Some(Value::Null) if !self.allow => Err(format!("{} can't be null", self.keyword)),
            _ => Ok(()),
        }
    }
}

/// Rejects `null`, whitespace-only strings and empty lists. An absent argument is fine.
#[derive(Debug, Clone)]
pub struct AllowBlank {
    keyword: String,
    allow: bool,
}

impl AllowBlank {
    pub fn new(keyword: impl Into<String>, allow: bool) -> Self {
        AllowBlank {
            keyword: keyword.into(),
            allow,
        }
    }
}

impl Validator for AllowBlank {
    fn validate(&self, arguments: &PreparedArguments, _: &FieldConfig) -> Result<(), String> {
        if self.allow {
            return Ok(());
        }

        let blank = match arguments.get(&self.keyword) {
            None => false,
            Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(Value::Array(items)) => items.is_empty(),
            Some(Value::Object(fields)) => fields.is_empty(),
            Some(_) => false,
        };

        if blank {
            Err(format!("{} can't be blank", self.keyword))
        } else {
            Ok(())
        }
    }
}

/// Caps a page size argument at the field's `max_page_size`. Fields without a maximum accept any size.
#[derive(Debug, Clone)]
pub struct PageSize {
    keyword: String,
}

impl PageSize {
    pub fn new(keyword: impl Into<String>) -> Self {
        PageSize {
            keyword: keyword.into(),
        }
    }
}

impl Validator for PageSize {
    fn validate(&self, arguments: &PreparedArguments, config: &FieldConfig) -> Result<(), String> {
        let (Some(maximum), Some(value)) = (config.max_page_size(), present(arguments, &self.keyword)) else {
            return Ok(());
        };

        match value.as_u64() {
            Some(size) if size <= maximum as u64 => Ok(()),
            Some(_) => Err(format!("{} must be less than or equal to {maximum}", self.keyword)),
            None => Err(format!("{} must be a non-negative integer", self.keyword)),
        }
    }
}
