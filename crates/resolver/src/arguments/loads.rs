use std::sync::Arc;

use deferred::Deferred;
use serde_json::Value;

use super::ObjectLoader;
use crate::{
    context::ResolverContext,
    errors::{LoadApplicationObjectFailedError, ResolveError, UnauthorizedObjectError},
    resolver::FieldResolver,
};

type Loaded = Deferred<Result<Value, ResolveError>>;

/// List ids are all loaded at once and keep their position. `null` ids stay `null`.
pub(super) fn load_objects<R: FieldResolver>(
    ctx: &ResolverContext<R>,
    loader: &Arc<dyn ObjectLoader<R>>,
    keyword: &str,
    is_list: bool,
    value: Value,
) -> Loaded {
    match value {
        Value::Array(ids) if is_list => {
            deferred::try_join_all(ids.into_iter().map(|id| load_object(ctx, loader, keyword, id))).map_ok(Value::Array)
        }
        id => load_object(ctx, loader, keyword, id),
    }
}

fn load_object<R: FieldResolver>(
    ctx: &ResolverContext<R>,
    loader: &Arc<dyn ObjectLoader<R>>,
    keyword: &str,
    id: Value,
) -> Loaded {
    if id.is_null() {
        return Deferred::Ready(Ok(Value::Null));
    }

    let object = {
        let keyword = keyword.to_owned();
        loader
            .load(ctx, &id)
            .map_err(move |err| ResolveError::argument(keyword, err))
    };

    let ctx = ctx.clone();
    let loader = loader.clone();
    let keyword = keyword.to_owned();

    object.and_then(move |object| match object {
        Some(object) => authorize_object(ctx, loader, keyword, object),
        None => {
            let error = LoadApplicationObjectFailedError {
                field: ctx.coordinate().clone(),
                keyword,
                type_name: loader.type_name().to_owned(),
                id,
            };

            tracing::debug!(
                field = %error.field,
                argument = %error.keyword,
                id = %error.id,
                "application object not found"
            );
            ctx.resolver().load_application_object_failed(&ctx, error)
        }
    })
}

fn authorize_object<R: FieldResolver>(
    ctx: ResolverContext<R>,
    loader: Arc<dyn ObjectLoader<R>>,
    keyword: String,
    object: Value,
) -> Loaded {
    let allowed = {
        let keyword = keyword.clone();
        loader
            .authorized(&ctx, &object)
            .map_err(move |err| ResolveError::argument(keyword, err))
    };

    allowed.and_then(move |allowed| {
        if allowed {
            return Deferred::Ready(Ok(object));
        }

        let error = UnauthorizedObjectError {
            field: ctx.coordinate().clone(),
            keyword,
            type_name: loader.type_name().to_owned(),
            object,
        };

        tracing::debug!(field = %error.field, argument = %error.keyword, "loaded object failed its authorization");
        ctx.resolver().unauthorized_object(&ctx, error)
    })
}
