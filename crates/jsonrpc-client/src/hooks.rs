//! Policy hooks.
//!
//! Protocol adapters configure the generic client through these hook
//! functions instead of specializing it by inheritance.

use serde_json::Value;

/// Rewrites an outbound method name (e.g. applies a namespace prefix).
pub type MethodRewriteFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Decorates outbound positional parameters (e.g. injects a credential).
pub type ParamDecorateFn = Box<dyn Fn(Vec<Value>) -> Vec<Value> + Send + Sync>;

/// Translates an inbound notification name into the list of event names to
/// emit; every returned name carries the identical payload.
pub type NotificationNamesFn = Box<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Configurable policy hooks applied by the client core.
///
/// All hooks are optional; an absent hook is the identity.
#[derive(Default)]
pub struct Hooks {
    /// Outbound method rewrite.
    pub rewrite_method: Option<MethodRewriteFn>,
    /// Outbound parameter decoration.
    pub decorate_params: Option<ParamDecorateFn>,
    /// Inbound notification name translation.
    pub notification_names: Option<NotificationNamesFn>,
}

impl Hooks {
    /// Create hooks with every policy set to the identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the method rewrite hook.
    pub fn rewrite_method(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.rewrite_method = Some(Box::new(f));
        self
    }

    /// Set the parameter decoration hook.
    pub fn decorate_params(
        mut self,
        f: impl Fn(Vec<Value>) -> Vec<Value> + Send + Sync + 'static,
    ) -> Self {
        self.decorate_params = Some(Box::new(f));
        self
    }

    /// Set the notification name translation hook.
    pub fn notification_names(
        mut self,
        f: impl Fn(&str) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.notification_names = Some(Box::new(f));
        self
    }
}
