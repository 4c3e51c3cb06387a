use serde_json::Value;

/// Outcome of a readiness or authorization check.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    Pass,
    /// Plain denial. Readiness resolves the field to `null`, authorization raises an error.
    Fail,
    /// Denial with a substitute value, which becomes the field's result.
    FailWith(Value),
}

/// What a user hook hands back before it's checked. Hooks written in Rust usually return a
/// `bool` or a `(false, value)` pair, dynamic ones return JSON: `true`, `false` or
/// `[false, value]`. Anything else is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum HookReturn {
    Bool(bool),
    Pair(bool, Value),
    Json(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum HookKind {
    #[strum(serialize = "ready")]
    Ready,
    #[strum(serialize = "authorized")]
    Authorized,
    #[strum(serialize = "argument authorization")]
    ArgumentAuthorized,
}

impl HookReturn {
    pub fn pass() -> Self {
        HookReturn::Bool(true)
    }

    pub fn deny() -> Self {
        HookReturn::Bool(false)
    }

    pub fn deny_with(value: impl Into<Value>) -> Self {
        HookReturn::Pair(false, value.into())
    }

    /// Gives the hook output back untouched if it isn't one of the accepted shapes.
    pub fn into_gate(self) -> Result<Gate, HookReturn> {
        match self {
            HookReturn::Bool(true) | HookReturn::Json(Value::Bool(true)) => Ok(Gate::Pass),
            HookReturn::Bool(false) | HookReturn::Json(Value::Bool(false)) => Ok(Gate::Fail),
            HookReturn::Pair(false, value) => Ok(Gate::FailWith(value)),
            HookReturn::Json(Value::Array(items)) if items.len() == 2 && items[0] == Value::Bool(false) => {
                let value = items.into_iter().nth(1).unwrap_or_default();
                Ok(Gate::FailWith(value))
            }
            other => Err(other),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            HookReturn::Bool(allowed) => Value::Bool(*allowed),
            HookReturn::Pair(allowed, value) => Value::Array(vec![Value::Bool(*allowed), value.clone()]),
            HookReturn::Json(value) => value.clone(),
        }
    }
}

impl From<bool> for HookReturn {
    fn from(allowed: bool) -> Self {
        HookReturn::Bool(allowed)
    }
}

impl From<(bool, Value)> for HookReturn {
    fn from((allowed, value): (bool, Value)) -> Self {
        HookReturn::Pair(allowed, value)
    }
}

impl From<Value> for HookReturn {
    fn from(value: Value) -> Self {
        HookReturn::Json(value)
    }
}

impl From<Gate> for HookReturn {
    fn from(gate: Gate) -> Self {
        match gate {
            Gate::Pass => HookReturn::Bool(true),
            Gate::Fail => HookReturn::Bool(false),
            Gate::FailWith(value) => HookReturn::Pair(false, value),
        }
    }
}
