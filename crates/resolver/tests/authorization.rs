mod common;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use common::{build, invoke, ready, TestResolver, Viewer};
use deferred::Completer;
use field_resolver::{ArgumentDefinition, Deferred, FieldDefinition, GraphqlError, HookKind, HookReturn, ResolveError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn unauthorized(err: ResolveError) -> field_resolver::UnauthorizedFieldError {
    match err {
        ResolveError::Unauthorized(err) => err,
        other => unreachable!("expected an authorization error, got {other:?}"),
    }
}

#[test]
fn only_explicit_values_are_authorized() {
    let checks = Arc::new(AtomicUsize::new(0));

    let counter = checks.clone();
    let status = ArgumentDefinition::new("status", "Status")
        .with_default_value("PUBLISHED")
        .authorize(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Deferred::Ready(Ok(HookReturn::deny()))
        });
    let (field, calls) = build(FieldDefinition::builder().argument(status), TestResolver::echo());

    for arguments in [json!({}), json!({"status": null}), json!({"status": "PUBLISHED"})] {
        assert!(ready(invoke(&field, arguments).resolve()).is_ok());
    }
    assert_eq!(checks.load(Ordering::SeqCst), 0);
    assert_eq!(calls.resolve(), 3);

    let err = unauthorized(ready(invoke(&field, json!({"status": "DRAFT"})).resolve()).unwrap_err());

    assert_eq!(checks.load(Ordering::SeqCst), 1);
    assert_eq!(err.argument(), Some("status"));
    assert_eq!(err.object::<Viewer>().map(|viewer| viewer.name), Some("root"));
    assert_eq!((calls.authorized(), calls.resolve()), (0, 3));

    let error = GraphqlError::from(err);
    assert_eq!(error.extension("argument"), Some(&json!("status")));
}

#[test]
fn integer_matching_a_float_default_is_not_authorized() {
    let checks = Arc::new(AtomicUsize::new(0));

    let counter = checks.clone();
    let ratio = ArgumentDefinition::new("ratio", "Float").with_default_value(1.0).authorize(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Deferred::Ready(Ok(HookReturn::deny()))
    });
    let (field, calls) = build(FieldDefinition::builder().argument(ratio), TestResolver::echo());

    assert_eq!(ready(invoke(&field, json!({"ratio": 1})).resolve()).unwrap(), json!({"ratio": 1}));
    assert_eq!(checks.load(Ordering::SeqCst), 0);

    let err = unauthorized(ready(invoke(&field, json!({"ratio": 2})).resolve()).unwrap_err());

    assert_eq!(err.argument(), Some("ratio"));
    assert_eq!(checks.load(Ordering::SeqCst), 1);
    assert_eq!(calls.resolve(), 1);
}

#[test]
fn argument_replacement_short_circuits() {
    let checks = Arc::new(AtomicUsize::new(0));

    let counter = checks.clone();
    let builder = FieldDefinition::builder()
        .argument(
            ArgumentDefinition::new("id", "ID!")
                .authorize(|_, _| Deferred::Ready(Ok(HookReturn::deny_with("HIDDEN")))),
        )
        .argument(ArgumentDefinition::new("token", "String").authorize(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Deferred::Ready(Ok(HookReturn::pass()))
        }));
    let (field, calls) = build(builder, TestResolver::echo());

    let result = ready(invoke(&field, json!({"id": "1", "token": "abc"})).resolve());

    assert_eq!(result.unwrap(), json!("HIDDEN"));
    assert_eq!(checks.load(Ordering::SeqCst), 0);
    assert_eq!((calls.authorized(), calls.resolve()), (0, 0));
}

#[tokio::test]
async fn argument_checks_run_one_after_another_in_declaration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let completers = Arc::new(Mutex::new(Vec::<Completer<HookReturn>>::new()));

    let (first, pending) = (order.clone(), completers.clone());
    let second = order.clone();
    let builder = FieldDefinition::builder()
        .argument(ArgumentDefinition::new("a", "Int").authorize(move |_, _| {
            first.lock().unwrap().push("a");
            let (completer, value) = deferred::oneshot();
            pending.lock().unwrap().push(completer);
            value.map(|result| result.map_err(|_| GraphqlError::internal_server_error()))
        }))
        .argument(ArgumentDefinition::new("b", "Int").authorize(move |_, _| {
            second.lock().unwrap().push("b");
            Deferred::Ready(Ok(HookReturn::pass()))
        }));
    let (field, calls) = build(builder, TestResolver::echo());

    let result = invoke(&field, json!({"b": 2, "a": 1})).resolve();

    assert!(result.is_pending());
    assert_eq!(*order.lock().unwrap(), vec!["a"]);

    let completer = completers.lock().unwrap().pop().unwrap();
    completer.complete(HookReturn::pass());

    assert_eq!(result.await.unwrap(), json!({"b": 2, "a": 1}));
    assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
    assert_eq!(calls.authorized(), 1);
}

#[test]
fn argument_hooks_see_the_prepared_value() {
    let argument = ArgumentDefinition::new("limit", "Int")
        .prepare(|_, value| Deferred::Ready(Ok(json!(value.as_i64().unwrap_or_default() * 10))))
        .authorize(|_, value: &Value| Deferred::Ready(Ok((value.as_i64() <= Some(50)).into())));
    let (field, _) = build(FieldDefinition::builder().argument(argument), TestResolver::echo());

    assert_eq!(
        ready(invoke(&field, json!({"limit": 5})).resolve()).unwrap(),
        json!({"limit": 50})
    );

    let err = unauthorized(ready(invoke(&field, json!({"limit": 6})).resolve()).unwrap_err());
    assert_eq!(err.argument(), Some("limit"));
}

#[test]
fn malformed_argument_hook() {
    let argument = ArgumentDefinition::new("id", "ID").authorize(|_, _| Deferred::Ready(Ok(json!([false]).into())));
    let (field, calls) = build(FieldDefinition::builder().argument(argument), TestResolver::echo());

    let err = ready(invoke(&field, json!({"id": "1"})).resolve()).unwrap_err();

    assert!(matches!(
        err,
        ResolveError::MalformedHook {
            hook: HookKind::ArgumentAuthorized,
            ..
        }
    ));
    assert_eq!(calls.resolve(), 0);
}

#[test]
fn whole_call_authorization_sees_all_prepared_arguments() {
    let resolver = TestResolver::echo().with_authorized(|arguments| {
        let owner = arguments.get("owner_id") == Some(&json!(7));
        Deferred::Ready(Ok(owner.into()))
    });
    let argument =
        ArgumentDefinition::new("ownerId", "Int").prepare(|_, value| Deferred::Ready(Ok(json!(value.as_i64()))));
    let (field, _) = build(FieldDefinition::builder().argument(argument), resolver);

    assert!(ready(invoke(&field, json!({"owner_id": 7})).resolve()).is_ok());

    let err = unauthorized(ready(invoke(&field, json!({"owner_id": 8})).resolve()).unwrap_err());
    assert_eq!(err.argument(), None);
}

#[test]
fn redefined_argument_replaces_the_inherited_one() {
    let base = FieldDefinition::builder().argument(
        ArgumentDefinition::new("status", "Status").authorize(|_, _| Deferred::Ready(Ok(HookReturn::deny()))),
    );
    let child = base.clone().argument(ArgumentDefinition::new("status", "Status!"));

    let (base, _) = build(base, TestResolver::echo());
    let (child, _) = build(child, TestResolver::echo());

    assert!(ready(invoke(&base, json!({"status": "DRAFT"})).resolve()).is_err());
    assert_eq!(
        ready(invoke(&child, json!({"status": "DRAFT"})).resolve()).unwrap(),
        json!({"status": "DRAFT"})
    );
    assert_eq!(child.arguments().get("status").map(|argument| argument.ty()), Some("Status!"));
}
