//! The handler registry and hook dispatcher.

use crate::config::{InvokerConfig, RequestParams};
use crate::debug;
use crate::killswitch::KillSwitch;
use crate::registry::{HandlerEntry, HandlerSnapshot, HookEntry, RegistrySnapshot};
use core::fmt;
use hookwire_bus::{Bus, Callback, callback};
use hookwire_system::ConfigError;
use hookwire_system::constants::Constants;
use hookwire_system::context::{Context, ContextMask, ContextProvider, ContextSignals};
use hookwire_system::priority::PriorityScope;
use hookwire_system::reflection::{
    Call, ClassDef, Decorator, DecoratorKind, FunctionDef, HandlerObject, HookDescriptor,
    Reflectable, Reflection, Target, extract_decorators, extract_single_decorator, is_hookable,
};
use hookwire_system::spec::{HookKind, InvokeMode, Requirement, Strategy};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::{Arc, Weak};

/// Hooks of one handler, keyed by method name.
pub type HookTable = IndexMap<String, Vec<Arc<HookEntry>>>;

// ─────────────────────────────────────────────────────────────────────────────
// InvokerBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for [`Invoker`].
pub struct InvokerBuilder {
    bus: Arc<dyn Bus>,
    context: Option<Context>,
    provider: Option<Box<dyn ContextProvider>>,
    config: Option<InvokerConfig>,
    constants: Constants,
    request: RequestParams,
    classes: Vec<ClassDef>,
}

impl InvokerBuilder {
    /// Pins the active context.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Classifies the active context with `provider`. Ignored if a context
    /// was pinned.
    #[must_use]
    pub fn with_context_provider(mut self, provider: impl ContextProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Sets the configuration. Defaults to [`InvokerConfig::from_constants`].
    #[must_use]
    pub fn with_config(mut self, config: InvokerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the environment constants. Defaults to none.
    #[must_use]
    pub fn with_constants(mut self, constants: Constants) -> Self {
        self.constants = constants;
        self
    }

    /// Sets the current request's parameters.
    #[must_use]
    pub fn with_request(mut self, request: RequestParams) -> Self {
        self.request = request;
        self
    }

    /// Declares a handler class up front.
    #[must_use]
    pub fn with_class(mut self, class: ClassDef) -> Self {
        self.classes.push(class);
        self
    }

    /// Builds the invoker.
    ///
    /// The context is classified once, here: a pinned context wins, then the
    /// provider, then [`ContextSignals`] read from the constants.
    ///
    /// # Errors
    ///
    /// Returns an error if a class declaration is rejected by the catalog.
    pub fn build(self) -> Result<Arc<Invoker>, ConfigError> {
        let config = self
            .config
            .unwrap_or_else(|| InvokerConfig::from_constants(&self.constants));
        let context = self
            .context
            .or_else(|| self.provider.as_ref().map(|provider| provider.context()))
            .unwrap_or_else(|| ContextSignals::from_constants(&self.constants).context());
        let killswitch = KillSwitch::new(&config, &self.request);

        if killswitch.is_engaged() {
            tracing::warn!(
                param = killswitch.param(),
                "kill-switch engaged, hooks outside diagnostics are suppressed"
            );
        }

        let invoker = Arc::new_cyclic(|this| Invoker {
            this: Weak::clone(this),
            bus: self.bus,
            reflection: Reflection::new(),
            constants: self.constants,
            context,
            config,
            killswitch,
            handlers: RwLock::new(IndexMap::new()),
            hooks: RwLock::new(IndexMap::new()),
        });

        for class in self.classes {
            invoker.define(class)?;
        }

        if invoker.config.diagnostics() {
            debug::install(&invoker)?;
        }

        tracing::debug!(context = %invoker.context, debug = invoker.config.is_debug(), "invoker ready");
        Ok(invoker)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Invoker
// ─────────────────────────────────────────────────────────────────────────────

/// Registers handlers, initializes them according to their [`Strategy`],
/// and wires their hooks to the bus.
///
/// Exactly one invoker exists per run. It is only handed out as
/// `Arc<Invoker>` and is not `Clone`; bus callbacks hold a weak reference
/// back to it.
///
/// # Gating
///
/// Before a handler initializes or a hook is wired, these checks run in
/// order and stop at the first failure:
///
/// 1. kill-switch (diagnostics handlers exempt)
/// 2. dependency ([`Requirement`])
/// 3. context mask against the active [`Context`]
/// 4. conditional and class predicates
///
/// A failed gate is not an error. The handler or hook is skipped and stays
/// uninitialized or uninvoked.
///
/// # Example
///
/// ```
/// use hookwire_bus::HookBus;
/// use hookwire_invoker::{Invoker, InvokerConfig};
/// use hookwire_system::prelude::*;
/// use serde_json::Value;
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Footer;
///
/// let bus = Arc::new(HookBus::new());
/// let invoker = Invoker::builder(bus.clone())
///     .with_config(InvokerConfig::new().with_diagnostics(false))
///     .with_class(
///         ClassDef::builder::<Footer>("site::Footer")
///             .with_handler(HandlerSpec::builder().with_tag("init"))
///             .with_default_constructor()
///             .with_method(
///                 Method::new("credits", |_: &Footer, _: Call<'_>| Value::Null)
///                     .with_hook(HookSpec::action("wp_footer")),
///             )
///             .build()?,
///     )
///     .build()?;
///
/// invoker.register_handler("site::Footer")?;
/// assert!(!invoker.handler("site::Footer").unwrap().is_initialized());
///
/// bus.do_action("init", &[]);
/// assert!(invoker.handler("site::Footer").unwrap().is_initialized());
/// # Ok::<(), ConfigError>(())
/// ```
pub struct Invoker {
    this: Weak<Invoker>,
    bus: Arc<dyn Bus>,
    reflection: Reflection,
    constants: Constants,
    context: Context,
    config: InvokerConfig,
    killswitch: KillSwitch,
    handlers: RwLock<IndexMap<String, Arc<HandlerEntry>>>,
    hooks: RwLock<IndexMap<String, HookTable>>,
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("context", &self.context)
            .field("config", &self.config)
            .field("killswitch", &self.killswitch)
            .field("handlers", &self.handlers.read().len())
            .finish_non_exhaustive()
    }
}

impl Invoker {
    /// Starts building an invoker on top of `bus`.
    pub fn builder(bus: Arc<dyn Bus>) -> InvokerBuilder {
        InvokerBuilder {
            bus,
            context: None,
            provider: None,
            config: None,
            constants: Constants::new(),
            request: RequestParams::new(),
            classes: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// The active context, classified once at build time.
    #[must_use]
    pub fn context(&self) -> Context {
        self.context
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// The kill-switch state for this request.
    #[must_use]
    pub fn killswitch(&self) -> &KillSwitch {
        &self.killswitch
    }

    /// The environment constants.
    #[must_use]
    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    /// The bus hooks are wired to.
    #[must_use]
    pub fn bus(&self) -> &Arc<dyn Bus> {
        &self.bus
    }

    /// The class catalog.
    #[must_use]
    pub fn reflection(&self) -> &Reflection {
        &self.reflection
    }

    /// Registered handlers in registration order.
    #[must_use]
    pub fn handlers(&self) -> Vec<Arc<HandlerEntry>> {
        self.handlers.read().values().cloned().collect()
    }

    /// A registered handler by class name.
    #[must_use]
    pub fn handler(&self, classname: &str) -> Option<Arc<HandlerEntry>> {
        self.handlers.read().get(classname).cloned()
    }

    /// The hook table of a handler. Empty until its methods are registered.
    #[must_use]
    pub fn hooks(&self, classname: &str) -> HookTable {
        self.hooks.read().get(classname).cloned().unwrap_or_default()
    }

    /// The hooks bound to one method of a handler.
    #[must_use]
    pub fn hooks_for(&self, classname: &str, method: &str) -> Vec<Arc<HookEntry>> {
        self.hooks
            .read()
            .get(classname)
            .and_then(|table| table.get(method))
            .cloned()
            .unwrap_or_default()
    }

    /// A serializable view of every handler and hook.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        let handlers = self
            .handlers()
            .iter()
            .map(|handler| {
                let hooks: Vec<_> = self
                    .hooks(handler.classname())
                    .into_values()
                    .flatten()
                    .collect();
                HandlerSnapshot::capture(handler, &hooks)
            })
            .collect();

        RegistrySnapshot {
            context: self.context.display_name().to_string(),
            killswitch: self.killswitch.is_engaged(),
            handlers,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Declaration and registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a class to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateClass`] if the name is taken.
    pub fn define(&self, class: ClassDef) -> Result<Arc<ClassDef>, ConfigError> {
        self.reflection.define(class)
    }

    /// Registers several handlers in order. Stops at the first error.
    ///
    /// # Errors
    ///
    /// See [`register_handler`](Self::register_handler).
    pub fn register_handlers<I, S>(&self, classnames: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for classname in classnames {
            self.register_handler(classname.as_ref())?;
        }
        Ok(())
    }

    /// Registers a handler and acts on its [`Strategy`].
    ///
    /// Registering the same class twice is a no-op.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownClass`] if the class is not declared.
    /// - [`ConfigError::MissingHandlerSpec`] if it carries no handler metadata.
    /// - [`ConfigError::MissingConstructor`] if the engine must create the
    ///   instance but the class declares no way to do so.
    pub fn register_handler(&self, classname: &str) -> Result<(), ConfigError> {
        if self.handlers.read().contains_key(classname) {
            return Ok(());
        }

        let class = self
            .reflection
            .class(classname)
            .ok_or_else(|| ConfigError::UnknownClass(classname.to_string()))?;
        let reflectable = Reflectable::Class(Arc::clone(&class));
        let spec = extract_single_decorator(&reflectable, DecoratorKind::Handler)
            .and_then(Decorator::as_handler)
            .cloned()
            .ok_or_else(|| ConfigError::MissingHandlerSpec(classname.to_string()))?;

        let strategy = spec.strategy();
        if strategy != Strategy::Dynamically && !class.can_construct() {
            return Err(ConfigError::MissingConstructor(classname.to_string()));
        }

        let priority = spec.priority(self);
        let entry = Arc::new(HandlerEntry::new(spec, class));
        self.handlers
            .write()
            .insert(classname.to_string(), Arc::clone(&entry));
        self.hooks.write().entry(classname.to_string()).or_default();

        tracing::debug!(
            handler = classname,
            ?strategy,
            tag = entry.spec().tag(),
            priority,
            "handler registered"
        );

        match strategy {
            Strategy::Unconditionally | Strategy::Early => {
                if self.construct(&entry) {
                    self.register_methods(&entry);
                    self.invoke_methods(classname);
                }
            }
            Strategy::Immediately => {
                if self.can_register(&entry) && self.initialize_handler(classname) {
                    self.register_methods(&entry);
                    self.invoke_methods(classname);
                }
            }
            Strategy::Deferred | Strategy::OnDemand => {
                if self.can_register(&entry) {
                    self.bus.register(
                        entry.spec().tag(),
                        self.deferred_callback(classname),
                        priority,
                        0,
                    );
                }
            }
            Strategy::JustInTime => {
                if self.can_register(&entry) {
                    self.register_methods(&entry);
                    self.invoke_methods(classname);
                }
            }
            Strategy::Dynamically => {}
        }

        Ok(())
    }

    /// Hands the engine a caller-constructed instance of a
    /// [`Strategy::Dynamically`] handler, then registers and wires its
    /// methods.
    ///
    /// The class is registered first if needed. Loading a second instance
    /// keeps the first.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownClass`] if no class is declared for `T`.
    /// - [`ConfigError::NotDynamic`] if the class uses another strategy.
    pub fn load_handler<T: HandlerObject>(&self, instance: Arc<T>) -> Result<(), ConfigError> {
        let class = self
            .reflection
            .class_of(instance.as_ref())
            .ok_or_else(|| ConfigError::UnknownClass(core::any::type_name::<T>().to_string()))?;
        let classname = class.name();

        self.register_handler(classname)?;
        let entry = self
            .handler(classname)
            .ok_or_else(|| ConfigError::UnknownClass(classname.to_string()))?;

        if entry.strategy() != Strategy::Dynamically {
            return Err(ConfigError::NotDynamic {
                classname: classname.to_string(),
                strategy: entry.strategy(),
            });
        }

        let target: Arc<dyn HandlerObject> = instance;
        if entry.set_target(target) {
            tracing::debug!(handler = classname, "handler loaded");
        } else {
            tracing::warn!(handler = classname, "handler already loaded, keeping first instance");
        }

        self.register_methods(&entry);
        self.invoke_methods(classname);
        Ok(())
    }

    /// Wires the hooks of a declared free function directly to the bus.
    ///
    /// Returns the number of hooks wired.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTarget`] if no such function is declared.
    pub fn register_function(&self, name: &str) -> Result<usize, ConfigError> {
        let Reflectable::Function(function) = self.reflection.resolve_target(Target::Function(name))?
        else {
            return Err(ConfigError::InvalidTarget(name.to_string()));
        };

        let mut wired = 0;
        for hook in function.hooks() {
            let gated = self.killswitch.suppresses(name)
                || !self.dependency_met(hook.requires())
                || !self.context_matches(hook.context())
                || !hook.check_conditional();
            if gated {
                tracing::trace!(function = name, tag = hook.tag(), "function hook gated");
                continue;
            }

            let body = Arc::clone(&function);
            let kind = hook.kind();
            self.bus.register(
                hook.tag(),
                callback(move |args| settle(kind, FunctionDef::call(&body, Call::new(args)))),
                hook.priority(self),
                function.declared_args(),
            );
            wired += 1;
        }

        tracing::debug!(function = name, wired, "function hooks wired");
        Ok(wired)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Initializes a registered handler if its gates pass.
    ///
    /// Returns true if the handler is initialized afterwards.
    pub fn initialize_handler(&self, classname: &str) -> bool {
        let Some(entry) = self.handler(classname) else {
            return false;
        };
        if entry.is_initialized() {
            return true;
        }

        let spec = entry.spec();
        if !self.can_activate(classname, spec.context(), spec.requires()) {
            return false;
        }
        if !spec.check_conditional() || !entry.class().can_initialize() {
            tracing::trace!(handler = classname, "handler initialization declined");
            return false;
        }

        self.construct(&entry)
    }

    /// Registers the hooks of a handler's hookable methods. Idempotent.
    pub fn register_methods(&self, entry: &HandlerEntry) {
        if !entry.claim_methods() {
            return;
        }

        let class = entry.class();
        let mut table = HookTable::new();
        for (index, method) in class.methods().iter().enumerate() {
            if !is_hookable(class, method) {
                continue;
            }

            let reflectable = Reflectable::Method {
                class: Arc::clone(class),
                index,
            };
            let hooks: Vec<_> = extract_decorators(&reflectable, DecoratorKind::Hook)
                .into_iter()
                .filter_map(Decorator::as_hook)
                .map(|spec| Arc::new(HookEntry::new(spec.clone(), entry, index, method)))
                .collect();
            table.entry(method.name().to_string()).or_default().extend(hooks);
        }

        tracing::debug!(
            handler = entry.classname(),
            methods = table.len(),
            "methods registered"
        );
        self.hooks
            .write()
            .entry(entry.classname().to_string())
            .or_default()
            .extend(table);
    }

    /// Runs [`invoke_hook`](Self::invoke_hook) on every hook of a handler.
    pub fn invoke_methods(&self, classname: &str) {
        let hooks: Vec<_> = self.hooks(classname).into_values().flatten().collect();
        for hook in &hooks {
            self.invoke_hook(hook);
        }
    }

    /// Wires one hook to the bus if its gates pass.
    ///
    /// Returns true if the hook is invoked afterwards. Invoked means wired,
    /// not fired.
    pub fn invoke_hook(&self, hook: &Arc<HookEntry>) -> bool {
        if hook.is_invoked() {
            return true;
        }
        let Some(handler) = self.handler(hook.handler()) else {
            return false;
        };

        let spec = hook.spec();
        if !self.can_activate(hook.handler(), spec.context(), spec.requires()) {
            return false;
        }
        if handler.strategy() != Strategy::Dynamically
            && !self.context_matches(handler.spec().context())
        {
            tracing::trace!(handler = hook.handler(), method = hook.method(), "handler context excludes hook");
            return false;
        }
        if !self.can_invoke(hook, &handler) {
            tracing::trace!(handler = hook.handler(), method = hook.method(), "hook cannot be invoked");
            return false;
        }

        let callback = match hook.mode() {
            InvokeMode::Directly => match direct_callback(hook, &handler) {
                Some(callback) => callback,
                None => return false,
            },
            InvokeMode::Indirectly => self.indirect_callback(hook),
        };

        let priority = spec.priority(self);
        self.bus
            .register(hook.tag(), callback, priority, hook.accepted_args());
        hook.mark_invoked();

        tracing::debug!(
            handler = hook.handler(),
            method = hook.method(),
            tag = hook.tag(),
            priority,
            accepted_args = hook.accepted_args(),
            mode = ?hook.mode(),
            "hook wired"
        );
        true
    }

    /// Creates the instance without gating.
    fn construct(&self, entry: &HandlerEntry) -> bool {
        if entry.is_initialized() {
            return true;
        }
        let Some(target) = entry.class().instantiate() else {
            tracing::warn!(handler = entry.classname(), "no way to construct handler");
            return false;
        };

        if entry.set_target(Arc::clone(&target)) {
            entry.class().after_initialize(target.as_ref());
            tracing::debug!(handler = entry.classname(), strategy = ?entry.strategy(), "handler initialized");
        }
        true
    }

    /// Body of the bus callback for `Deferred` and `OnDemand` handlers.
    fn load_deferred(&self, classname: &str) {
        let Some(entry) = self.handler(classname) else {
            return;
        };

        match entry.strategy() {
            Strategy::OnDemand => {
                self.register_methods(&entry);
                self.invoke_methods(classname);
            }
            _ => {
                if self.initialize_handler(classname) {
                    self.register_methods(&entry);
                    self.invoke_methods(classname);
                }
            }
        }
    }

    fn deferred_callback(&self, classname: &str) -> Callback {
        let this = Weak::clone(&self.this);
        let classname = classname.to_string();
        callback(move |_| {
            if let Some(invoker) = this.upgrade() {
                invoker.load_deferred(&classname);
            }
            Value::Null
        })
    }

    fn indirect_callback(&self, hook: &Arc<HookEntry>) -> Callback {
        let this = Weak::clone(&self.this);
        let hook = Arc::clone(hook);
        callback(move |args| match this.upgrade() {
            Some(invoker) => invoker.fire_indirect(&hook, args),
            None => passthrough(hook.kind(), args),
        })
    }

    /// Body of an indirect callback. Re-validates, then delegates to the
    /// method. A declined call leaves a filter's value untouched.
    fn fire_indirect(&self, hook: &HookEntry, args: &[Value]) -> Value {
        tracing::trace!(handler = hook.handler(), method = hook.method(), tag = hook.tag(), "indirect callback fired");

        let Some(handler) = self.handler(hook.handler()) else {
            return passthrough(hook.kind(), args);
        };

        let ready = match handler.strategy() {
            Strategy::JustInTime if handler.is_initialized() => {
                handler.spec().check_conditional() && handler.class().can_initialize()
            }
            Strategy::JustInTime | Strategy::OnDemand => self.initialize_handler(hook.handler()),
            _ => handler.is_initialized(),
        };
        if !ready || !self.can_invoke(hook, &handler) {
            return passthrough(hook.kind(), args);
        }

        let Some(target) = handler.target() else {
            return passthrough(hook.kind(), args);
        };
        let class = handler.class();
        if !class.can_invoke_method(hook.method(), target.as_ref(), hook, args) {
            tracing::trace!(handler = hook.handler(), method = hook.method(), "method predicate declined");
            return passthrough(hook.kind(), args);
        }

        let call = if hook.appends_hook() {
            Call::new(args).with_hook(hook)
        } else {
            Call::new(args)
        };
        match class.methods().get(hook.method_index()) {
            Some(method) => settle(hook.kind(), method.call(target.as_ref(), call)),
            None => passthrough(hook.kind(), args),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Gates
    // ─────────────────────────────────────────────────────────────────────────

    /// Kill-switch, then dependency, then context.
    fn can_activate(&self, classname: &str, mask: ContextMask, requires: Option<&Requirement>) -> bool {
        if self.killswitch.suppresses(classname) {
            tracing::trace!(handler = classname, "suppressed by kill-switch");
            return false;
        }
        if !self.dependency_met(requires) {
            tracing::trace!(handler = classname, ?requires, "dependency not met");
            return false;
        }
        if !self.context_matches(mask) {
            tracing::trace!(handler = classname, context = %self.context, "context mismatch");
            return false;
        }
        true
    }

    fn can_register(&self, entry: &HandlerEntry) -> bool {
        let allowed = self.context_matches(entry.spec().context()) && entry.class().can_register();
        if !allowed {
            tracing::trace!(handler = entry.classname(), "handler registration declined");
        }
        allowed
    }

    /// Indirect hooks pass while their tag is not firing, so they can be
    /// wired before the handler exists. Otherwise the conditional must pass
    /// and the handler must be initialized and willing.
    fn can_invoke(&self, hook: &HookEntry, handler: &HandlerEntry) -> bool {
        if hook.mode() == InvokeMode::Indirectly && !self.bus.is_firing(hook.tag()) {
            return true;
        }

        hook.spec().check_conditional()
            && handler
                .target()
                .is_some_and(|target| handler.class().can_invoke(target.as_ref()))
    }

    fn dependency_met(&self, requires: Option<&Requirement>) -> bool {
        match requires {
            None => true,
            Some(Requirement::Handler(classname)) => self
                .handler(classname)
                .is_some_and(|handler| handler.is_initialized()),
            Some(Requirement::Hook { handler, method }) => {
                let hooks = self.hooks_for(handler, method);
                !hooks.is_empty() && hooks.iter().all(|hook| hook.is_invoked())
            }
        }
    }

    fn context_matches(&self, mask: ContextMask) -> bool {
        self.context.is_valid(mask)
    }
}

/// Named priorities resolve against the constants first, then through the
/// bus as a filter over the default with the tag as argument.
impl PriorityScope for Invoker {
    fn constant(&self, name: &str) -> Option<i32> {
        self.constants.get_int(name)
    }

    fn filter_priority(&self, name: &str, default: i32, tag: &str) -> i32 {
        self.bus
            .apply_filters(name, Value::from(default), &[Value::from(tag)])
            .as_i64()
            .and_then(|value| i32::try_from(value).ok())
            .unwrap_or(default)
    }
}

fn direct_callback(hook: &HookEntry, handler: &HandlerEntry) -> Option<Callback> {
    let target = Arc::clone(handler.target()?);
    let class = Arc::clone(handler.class());
    let index = hook.method_index();
    let kind = hook.kind();

    Some(callback(move |args| match class.methods().get(index) {
        Some(method) => settle(kind, method.call(target.as_ref(), Call::new(args))),
        None => passthrough(kind, args),
    }))
}

/// What a declined callback returns: the filtered value for filters.
fn passthrough(kind: HookKind, args: &[Value]) -> Value {
    match kind {
        HookKind::Filter => args.first().cloned().unwrap_or(Value::Null),
        HookKind::Action => Value::Null,
    }
}

/// Actions discard their result.
fn settle(kind: HookKind, result: Value) -> Value {
    match kind {
        HookKind::Filter => result,
        HookKind::Action => Value::Null,
    }
}
