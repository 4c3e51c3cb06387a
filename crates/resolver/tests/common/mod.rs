#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use field_resolver::{
    Deferred, FieldCoordinate, FieldDefinition, FieldDefinitionBuilder, FieldResolution, FieldResolver, HookResult,
    HookReturn, Invocation, PreparedArguments, RawArguments, ResolveResult, ResolverContext,
};
use serde_json::Value;

#[derive(Debug, PartialEq)]
pub struct Viewer {
    pub name: &'static str,
}

#[derive(Debug, PartialEq)]
pub struct RequestContext {
    pub user_id: u64,
}

#[derive(Debug, Default)]
pub struct Calls {
    pub ready: AtomicUsize,
    pub authorized: AtomicUsize,
    pub resolve: AtomicUsize,
}

impl Calls {
    pub fn ready(&self) -> usize {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn authorized(&self) -> usize {
        self.authorized.load(Ordering::SeqCst)
    }

    pub fn resolve(&self) -> usize {
        self.resolve.load(Ordering::SeqCst)
    }
}

type ReadyHook = Box<dyn Fn(&RawArguments) -> HookResult + Send + Sync>;
type AuthorizedHook = Box<dyn Fn(&PreparedArguments) -> HookResult + Send + Sync>;
type ResolveFn = Box<dyn Fn(&PreparedArguments) -> ResolveResult + Send + Sync>;

/// Resolver with swappable hooks, counting how many times each one ran.
pub struct TestResolver {
    pub calls: Arc<Calls>,
    ready: ReadyHook,
    authorized: AuthorizedHook,
    resolve: ResolveFn,
}

impl TestResolver {
    /// Resolves to the prepared arguments as a JSON object.
    pub fn echo() -> Self {
        TestResolver::new(|arguments| Deferred::Ready(Ok(serde_json::to_value(arguments).unwrap())))
    }

    pub fn new(resolve: impl Fn(&PreparedArguments) -> ResolveResult + Send + Sync + 'static) -> Self {
        TestResolver {
            calls: Arc::default(),
            ready: Box::new(|_: &RawArguments| Deferred::Ready(Ok(HookReturn::pass()))),
            authorized: Box::new(|_: &PreparedArguments| Deferred::Ready(Ok(HookReturn::pass()))),
            resolve: Box::new(resolve),
        }
    }

    pub fn with_ready(mut self, ready: impl Fn(&RawArguments) -> HookResult + Send + Sync + 'static) -> Self {
        self.ready = Box::new(ready);
        self
    }

    pub fn with_authorized(
        mut self,
        authorized: impl Fn(&PreparedArguments) -> HookResult + Send + Sync + 'static,
    ) -> Self {
        self.authorized = Box::new(authorized);
        self
    }
}

impl FieldResolver for TestResolver {
    type Object = Viewer;
    type Context = RequestContext;

    fn ready(&self, _: &ResolverContext<Self>, arguments: &RawArguments) -> HookResult {
        self.calls.ready.fetch_add(1, Ordering::SeqCst);
        (self.ready)(arguments)
    }

    fn authorized(&self, _: &ResolverContext<Self>, arguments: &PreparedArguments) -> HookResult {
        self.calls.authorized.fetch_add(1, Ordering::SeqCst);
        (self.authorized)(arguments)
    }

    fn resolve(&self, _: &ResolverContext<Self>, arguments: &PreparedArguments) -> ResolveResult {
        self.calls.resolve.fetch_add(1, Ordering::SeqCst);
        (self.resolve)(arguments)
    }
}

/// Builds the field and returns the call counters of its resolver.
pub fn build(
    builder: FieldDefinitionBuilder<TestResolver>,
    resolver: TestResolver,
) -> (Arc<FieldDefinition<TestResolver>>, Arc<Calls>) {
    let calls = resolver.calls.clone();
    let field = builder.build(FieldCoordinate::new("Query", "post"), resolver);

    (field, calls)
}

pub fn invoke<R>(field: &Arc<FieldDefinition<R>>, arguments: Value) -> FieldResolution<R>
where
    R: FieldResolver<Object = Viewer, Context = RequestContext>,
{
    let Value::Object(arguments) = arguments else {
        unreachable!("arguments must be an object");
    };

    let invocation = Invocation::new(
        Arc::new(Viewer { name: "root" }),
        Arc::new(RequestContext { user_id: 7 }),
        arguments.into_iter().collect(),
    );

    FieldResolution::new(field.clone(), invocation)
}

/// Value of an immediate result, panics if it's still pending.
pub fn ready<T: Send + 'static>(value: Deferred<T>) -> T {
    value.into_ready().ok().expect("expected an immediate value")
}
