use deferred::Deferred;
use error::GraphqlError;
use serde_json::Value;

use crate::{
    context::ResolverContext,
    errors::ResolveError,
    gate::{Gate, HookKind, HookReturn},
    resolver::FieldResolver,
};

/// Checks a hook output at the boundary. Only `true`, `false` and `(false, value)` are accepted.
pub(crate) fn into_gate<R: FieldResolver>(
    ctx: &ResolverContext<R>,
    hook: HookKind,
    output: Result<HookReturn, GraphqlError>,
) -> Result<Gate, ResolveError> {
    output?.into_gate().map_err(|output| {
        let output = output.to_json();
        tracing::error!(field = %ctx.coordinate(), %hook, %output, "hook returned an unexpected value");

        ResolveError::MalformedHook {
            field: ctx.coordinate().clone(),
            hook,
            output,
        }
    })
}

/// Per-argument checks in declaration order, then the field's own `authorized` hook. Plain
/// denials are errors, `Gate::FailWith` is returned for the caller to short-circuit with.
pub(crate) fn authorize<R: FieldResolver>(ctx: &ResolverContext<R>) -> Deferred<Result<Gate, ResolveError>> {
    let whole_call = {
        let ctx = ctx.clone();
        move |gate: Gate| match gate {
            Gate::Pass => authorize_field(&ctx),
            short_circuit => Deferred::Ready(Ok(short_circuit)),
        }
    };

    authorize_arguments(ctx, 0).and_then(whole_call)
}

fn authorize_arguments<R: FieldResolver>(
    ctx: &ResolverContext<R>,
    from: usize,
) -> Deferred<Result<Gate, ResolveError>> {
    let definitions = ctx.field().arguments().iter().enumerate().skip(from);

    for (index, definition) in definitions {
        if !definition.has_authorization() {
            continue;
        }
        let keyword = definition.keyword();

        // Defaults and missing or null values are never checked.
        let Some(raw) = ctx.arguments().get(keyword).filter(|raw| !raw.is_null()) else {
            continue;
        };
        if is_default(raw, definition.default_value()) {
            continue;
        }

        let value = match ctx.prepared_arguments() {
            Ok(prepared) => prepared.get(keyword).cloned().unwrap_or_default(),
            Err(err) => return Deferred::Ready(Err(err)),
        };
        if value.is_null() {
            continue;
        }

        let Some(check) = definition.run_authorize(ctx, &value) else {
            continue;
        };

        let next = {
            let ctx = ctx.clone();
            let keyword = keyword.to_owned();

            move |output| match into_gate(&ctx, HookKind::ArgumentAuthorized, output) {
                Ok(Gate::Pass) => authorize_arguments(&ctx, index + 1),
                Ok(Gate::Fail) => {
                    tracing::debug!(field = %ctx.coordinate(), argument = %keyword, "argument authorization denied");
                    Deferred::Ready(Err(ctx.unauthorized().with_argument(keyword).into()))
                }
                Ok(Gate::FailWith(value)) => {
                    tracing::debug!(
                        field = %ctx.coordinate(),
                        argument = %keyword,
                        "argument authorization returned early"
                    );
                    Deferred::Ready(Ok(Gate::FailWith(value)))
                }
                Err(err) => Deferred::Ready(Err(err)),
            }
        };

        return check.then(next);
    }

    Deferred::Ready(Ok(Gate::Pass))
}

/// Numbers compare by value, so `1` matches a default of `1.0`.
fn is_default(raw: &Value, default: Option<&Value>) -> bool {
    match (raw, default) {
        (Value::Number(raw), Some(Value::Number(default))) => raw.as_f64() == default.as_f64(),
        (raw, default) => default == Some(raw),
    }
}

fn authorize_field<R: FieldResolver>(ctx: &ResolverContext<R>) -> Deferred<Result<Gate, ResolveError>> {
    let check = match ctx.prepared_arguments() {
        Ok(arguments) => ctx.resolver().authorized(ctx, arguments),
        Err(err) => return Deferred::Ready(Err(err)),
    };
    let ctx = ctx.clone();

    check.then(move |output| {
        let gate = match into_gate(&ctx, HookKind::Authorized, output) {
            Ok(Gate::Fail) => {
                tracing::debug!(field = %ctx.coordinate(), "field authorization denied");
                Err(ctx.unauthorized().into())
            }
            other => other,
        };

        Deferred::Ready(gate)
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::is_default;

    #[test]
    fn numeric_defaults_compare_by_value() {
        assert!(is_default(&json!(1), Some(&json!(1.0))));
        assert!(is_default(&json!(2.5), Some(&json!(2.5))));
        assert!(!is_default(&json!(1), Some(&json!(2))));
        assert!(!is_default(&json!("1"), Some(&json!(1))));
        assert!(is_default(&json!(["a"]), Some(&json!(["a"]))));
        assert!(!is_default(&json!(1), None));
    }
}
