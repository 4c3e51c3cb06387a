use deferred::Deferred;
use indexmap::IndexMap;
use serde_json::Value;

use super::PreparedArguments;
use crate::{context::ResolverContext, errors::ResolveError, resolver::FieldResolver};

/// Starts loading every raw argument. Arguments without a declaration are extras and are
/// kept untouched. Only the loads which didn't complete right away are combined into a
/// pending value, so a field without any is prepared immediately.
pub(crate) fn load_arguments<R: FieldResolver>(
    ctx: &ResolverContext<R>,
) -> Deferred<Result<PreparedArguments, ResolveError>> {
    let field = ctx.field();
    let mut prepared = IndexMap::with_capacity(ctx.arguments().len());
    let mut pending = Vec::new();

    for (keyword, value) in ctx.arguments() {
        let Some(definition) = field.arguments().get(keyword) else {
            if !field.config().is_extra(keyword) {
                tracing::debug!(field = %ctx.coordinate(), argument = %keyword, "passing through undeclared argument");
            }
            prepared.insert(keyword.clone(), value.clone());
            continue;
        };

        match definition.load_and_authorize(ctx, value.clone()) {
            Deferred::Ready(Ok(value)) => {
                prepared.insert(keyword.clone(), value);
            }
            Deferred::Ready(Err(err)) => return Deferred::Ready(Err(err)),
            Deferred::Pending(future) => {
                // Placeholder, keeps the raw order once the load completes.
                prepared.insert(keyword.clone(), Value::Null);

                let keyword = keyword.clone();
                pending.push(Deferred::Pending(future).map_ok(move |value| (keyword, value)));
            }
        }
    }

    if pending.is_empty() {
        return Deferred::Ready(Ok(PreparedArguments(prepared)));
    }

    tracing::debug!(field = %ctx.coordinate(), pending = pending.len(), "waiting for deferred arguments");

    deferred::try_join_all(pending).map_ok(move |loaded| {
        for (keyword, value) in loaded {
            prepared.insert(keyword, value);
        }
        PreparedArguments(prepared)
    })
}
