//! Handler class declarations.
//!
//! A [`ClassDef`] is the explicit stand-in for an annotated class: it carries
//! the class-level [`HandlerSpec`], the declared methods with their hook
//! specs, and the optional conventions the engine looks for (constructor,
//! singleton factory, post-initialization callback, predicates).

use super::method::{HookDescriptor, Method, MethodDef};
use crate::error::ConfigError;
use crate::spec::{HandlerSpec, HandlerSpecBuilder};
use core::any::TypeId;
use core::fmt;
use downcast_rs::{DowncastSync, impl_downcast};
use hashbrown::HashMap;
use serde_json::Value;
use std::sync::Arc;

/// A handler instance, type-erased.
///
/// Implemented for every `Send + Sync + 'static` type.
pub trait HandlerObject: DowncastSync {}
impl_downcast!(sync HandlerObject);

impl<T: Send + Sync + 'static> HandlerObject for T {}

impl fmt::Debug for dyn HandlerObject + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HandlerObject")
    }
}

type Factory = Arc<dyn Fn() -> Arc<dyn HandlerObject> + Send + Sync>;
type StaticPredicate = Arc<dyn Fn() -> bool + Send + Sync>;
type InstancePredicate = Arc<dyn Fn(&dyn HandlerObject) -> bool + Send + Sync>;
type MethodPredicate =
    Arc<dyn Fn(&dyn HandlerObject, &dyn HookDescriptor, &[Value]) -> bool + Send + Sync>;
type Lifecycle = Arc<dyn Fn(&dyn HandlerObject) + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// ClassDef
// ─────────────────────────────────────────────────────────────────────────────

/// A declared handler class.
pub struct ClassDef {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    handler: Option<HandlerSpec>,
    methods: Vec<MethodDef>,
    accessible_hook_methods: bool,
    constructor: Option<Factory>,
    singleton: Option<Factory>,
    on_initialize: Option<Lifecycle>,
    can_register: Option<StaticPredicate>,
    can_initialize: Option<StaticPredicate>,
    can_invoke: Option<InstancePredicate>,
    method_predicates: HashMap<String, MethodPredicate>,
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("handler", &self.handler)
            .field("methods", &self.methods)
            .field("accessible_hook_methods", &self.accessible_hook_methods)
            .finish_non_exhaustive()
    }
}

impl ClassDef {
    /// Starts declaring class `name` backed by the Rust type `T`.
    pub fn builder<T: HandlerObject>(name: impl Into<String>) -> ClassBuilder<T> {
        ClassBuilder::new(name.into())
    }

    /// The class name (registry key).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The backing Rust type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The backing Rust type's name, for debugging.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The class-level handler metadata, if declared.
    #[must_use]
    pub fn handler_spec(&self) -> Option<&HandlerSpec> {
        self.handler.as_ref()
    }

    /// All declared methods in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|method| method.name() == name)
    }

    /// Returns true if non-public methods may be hooked.
    #[must_use]
    pub fn has_accessible_hook_methods(&self) -> bool {
        self.accessible_hook_methods
    }

    /// Returns true if the engine can create an instance.
    #[must_use]
    pub fn can_construct(&self) -> bool {
        self.singleton.is_some() || self.constructor.is_some()
    }

    /// Creates an instance, preferring the singleton factory over the
    /// constructor.
    #[must_use]
    pub fn instantiate(&self) -> Option<Arc<dyn HandlerObject>> {
        self.singleton
            .as_ref()
            .or(self.constructor.as_ref())
            .map(|factory| factory())
    }

    /// Runs the post-initialization callback, if declared.
    pub fn after_initialize(&self, target: &dyn HandlerObject) {
        if let Some(callback) = &self.on_initialize {
            callback(target);
        }
    }

    /// The `can_register` predicate. Absent means permitted.
    #[must_use]
    pub fn can_register(&self) -> bool {
        self.can_register.as_ref().is_none_or(|predicate| predicate())
    }

    /// The `can_initialize` predicate. Absent means permitted.
    #[must_use]
    pub fn can_initialize(&self) -> bool {
        self.can_initialize
            .as_ref()
            .is_none_or(|predicate| predicate())
    }

    /// The instance `can_invoke` predicate. Absent means permitted.
    #[must_use]
    pub fn can_invoke(&self, target: &dyn HandlerObject) -> bool {
        self.can_invoke
            .as_ref()
            .is_none_or(|predicate| predicate(target))
    }

    /// Returns true if a per-method predicate is declared for `method`.
    #[must_use]
    pub fn has_method_predicate(&self, method: &str) -> bool {
        self.method_predicates.contains_key(method)
    }

    /// The per-method predicate for `method`, consulted with the live call
    /// arguments. Absent means permitted.
    #[must_use]
    pub fn can_invoke_method(
        &self,
        method: &str,
        target: &dyn HandlerObject,
        hook: &dyn HookDescriptor,
        args: &[Value],
    ) -> bool {
        self.method_predicates
            .get(method)
            .is_none_or(|predicate| predicate(target, hook, args))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ClassBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Typed builder for a [`ClassDef`].
///
/// # Example
///
/// ```
/// use hookwire_system::reflection::{Call, ClassDef, Method};
/// use hookwire_system::spec::{HandlerSpec, HookSpec, Strategy};
/// use serde_json::Value;
///
/// #[derive(Default)]
/// struct Greeter;
///
/// let class = ClassDef::builder::<Greeter>("app::Greeter")
///     .with_handler(HandlerSpec::builder().with_tag("init"))
///     .with_default_constructor()
///     .with_method(
///         Method::new("greet", |_: &Greeter, _: Call<'_>| Value::Null)
///             .with_hook(HookSpec::action("wp_head").with_priority(20)),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(class.handler_spec().unwrap().strategy(), Strategy::Deferred);
/// assert_eq!(class.methods().len(), 1);
/// ```
pub struct ClassBuilder<T> {
    name: String,
    handler: Option<HandlerSpecBuilder>,
    methods: Vec<Method<T>>,
    accessible_hook_methods: bool,
    constructor: Option<Factory>,
    singleton: Option<Factory>,
    on_initialize: Option<Lifecycle>,
    can_register: Option<StaticPredicate>,
    can_initialize: Option<StaticPredicate>,
    can_invoke: Option<InstancePredicate>,
    method_predicates: HashMap<String, MethodPredicate>,
}

impl<T: HandlerObject> ClassBuilder<T> {
    fn new(name: String) -> Self {
        Self {
            name,
            handler: None,
            methods: Vec::new(),
            accessible_hook_methods: false,
            constructor: None,
            singleton: None,
            on_initialize: None,
            can_register: None,
            can_initialize: None,
            can_invoke: None,
            method_predicates: HashMap::new(),
        }
    }

    /// Attaches the class-level handler metadata.
    #[must_use]
    pub fn with_handler(mut self, handler: HandlerSpecBuilder) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Declares a method.
    #[must_use]
    pub fn with_method(mut self, method: Method<T>) -> Self {
        self.methods.push(method);
        self
    }

    /// Allows protected and private methods to be hooked.
    #[must_use]
    pub fn with_accessible_hook_methods(mut self) -> Self {
        self.accessible_hook_methods = true;
        self
    }

    /// Declares the default constructor.
    #[must_use]
    pub fn with_constructor(mut self, constructor: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.constructor = Some(Arc::new(move || -> Arc<dyn HandlerObject> {
            Arc::new(constructor())
        }));
        self
    }

    /// Declares a singleton factory, used in preference to the constructor.
    #[must_use]
    pub fn with_singleton(mut self, factory: impl Fn() -> Arc<T> + Send + Sync + 'static) -> Self {
        self.singleton = Some(Arc::new(move || -> Arc<dyn HandlerObject> { factory() }));
        self
    }

    /// Declares a post-initialization callback.
    #[must_use]
    pub fn with_on_initialize(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_initialize = Some(Arc::new(move |target: &dyn HandlerObject| {
            if let Some(this) = target.downcast_ref::<T>() {
                callback(this);
            }
        }));
        self
    }

    /// Declares the `can_register` predicate.
    #[must_use]
    pub fn with_can_register(mut self, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.can_register = Some(Arc::new(predicate));
        self
    }

    /// Declares the `can_initialize` predicate.
    #[must_use]
    pub fn with_can_initialize(
        mut self,
        predicate: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        self.can_initialize = Some(Arc::new(predicate));
        self
    }

    /// Declares the instance `can_invoke` predicate.
    #[must_use]
    pub fn with_can_invoke(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.can_invoke = Some(Arc::new(move |target: &dyn HandlerObject| {
            target.downcast_ref::<T>().is_some_and(&predicate)
        }));
        self
    }

    /// Declares a per-method predicate for `method`.
    #[must_use]
    pub fn with_can_invoke_method(
        mut self,
        method: impl Into<String>,
        predicate: impl Fn(&T, &dyn HookDescriptor, &[Value]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.method_predicates.insert(
            method.into(),
            Arc::new(
                move |target: &dyn HandlerObject, hook: &dyn HookDescriptor, args: &[Value]| {
                    target
                        .downcast_ref::<T>()
                        .is_some_and(|this| predicate(this, hook, args))
                },
            ),
        );
        self
    }

    /// Validates and builds the declaration.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler spec or any hook spec is misconfigured.
    pub fn build(self) -> Result<ClassDef, ConfigError> {
        let handler = self.handler.map(HandlerSpecBuilder::build).transpose()?;
        let methods = self
            .methods
            .into_iter()
            .map(Method::build)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ClassDef {
            name: self.name,
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            handler,
            methods,
            accessible_hook_methods: self.accessible_hook_methods,
            constructor: self.constructor,
            singleton: self.singleton,
            on_initialize: self.on_initialize,
            can_register: self.can_register,
            can_initialize: self.can_initialize,
            can_invoke: self.can_invoke,
            method_predicates: self.method_predicates,
        })
    }
}

impl<T: HandlerObject + Default> ClassBuilder<T> {
    /// Declares `T::default` as the constructor.
    #[must_use]
    pub fn with_default_constructor(self) -> Self {
        self.with_constructor(T::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::Call;
    use core::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Plain {
        hits: AtomicUsize,
    }

    #[test]
    fn singleton_is_preferred_over_constructor() {
        let shared = Arc::new(Plain::default());
        shared.hits.store(7, Ordering::SeqCst);
        let instance = Arc::clone(&shared);

        let class = ClassDef::builder::<Plain>("Plain")
            .with_default_constructor()
            .with_singleton(move || Arc::clone(&instance))
            .build()
            .unwrap();

        let target = class.instantiate().unwrap();
        let plain = target.downcast_ref::<Plain>().unwrap();
        assert_eq!(plain.hits.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn absent_predicates_permit() {
        let class = ClassDef::builder::<Plain>("Plain").build().unwrap();
        let target = Plain::default();

        assert!(class.can_register());
        assert!(class.can_initialize());
        assert!(class.can_invoke(&target));
        assert!(!class.can_construct());
        assert!(class.instantiate().is_none());
    }

    #[test]
    fn instance_predicate_reads_state() {
        let class = ClassDef::builder::<Plain>("Plain")
            .with_can_invoke(|this: &Plain| this.hits.load(Ordering::SeqCst) > 0)
            .build()
            .unwrap();

        let target = Plain::default();
        assert!(!class.can_invoke(&target));
        target.hits.store(1, Ordering::SeqCst);
        assert!(class.can_invoke(&target));
    }

    #[test]
    fn on_initialize_runs_against_instance() {
        let class = ClassDef::builder::<Plain>("Plain")
            .with_default_constructor()
            .with_on_initialize(|this: &Plain| {
                this.hits.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        let target = class.instantiate().unwrap();
        class.after_initialize(target.as_ref());
        assert_eq!(
            target.downcast_ref::<Plain>().unwrap().hits.load(Ordering::SeqCst),
            1
        );
    }

    #[test]
    fn method_lookup_by_name() {
        let class = ClassDef::builder::<Plain>("Plain")
            .with_method(Method::new("a", |_: &Plain, _: Call<'_>| Value::Null))
            .with_method(Method::new("b", |_: &Plain, _: Call<'_>| Value::Null))
            .build()
            .unwrap();

        assert_eq!(class.method("b").map(MethodDef::name), Some("b"));
        assert!(class.method("c").is_none());
    }
}
