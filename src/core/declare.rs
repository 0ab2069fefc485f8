//! Declarative CVar registration.
//!
//! Hosts describe their variables up front as [`CVarDescriptor`]s (collected
//! from registration lists, config files, or anything else) and hand the
//! whole batch to [`CVarRegistry::register_declared`]. A descriptor that
//! cannot be applied is skipped and reported; it never aborts the batch.

use std::fmt;

use bevy::log::{info, warn};

use super::cvar::{CVarGetter, CVarSetter};
use super::{CVarCell, CVarRegistry, CVarType, ConsoleError, ConsoleResult};

/// How a declared CVar is backed.
pub enum DescriptorBinding {
    /// Value-backed, starting from a declared default string.
    Default(String),
    /// Delegate-backed through a host getter/setter pair.
    ///
    /// Both accessors must be present. `initial`, when set, is validated and
    /// written through the setter right after registration.
    Accessors {
        getter: Option<CVarGetter>,
        setter: Option<CVarSetter>,
        initial: Option<String>,
    },
}

impl fmt::Debug for DescriptorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorBinding::Default(value) => f.debug_tuple("Default").field(value).finish(),
            DescriptorBinding::Accessors { getter, setter, initial } => f
                .debug_struct("Accessors")
                .field("getter", &getter.is_some())
                .field("setter", &setter.is_some())
                .field("initial", initial)
                .finish(),
        }
    }
}

/// A host-declared variable.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::{CVarDescriptor, CVarRegistry, CVarType};
///
/// let mut registry = CVarRegistry::new();
/// let report = registry.register_declared([
///     CVarDescriptor::value("sv_maxplayers", CVarType::Integer, "16"),
///     CVarDescriptor::value("sv_hostname", CVarType::String, "My Server"),
///     // Rejected: not an integer
///     CVarDescriptor::value("sv_tickrate", CVarType::Integer, "fast"),
/// ]);
///
/// assert_eq!(report.registered, vec!["sv_maxplayers", "sv_hostname"]);
/// assert_eq!(report.skipped.len(), 1);
/// ```
#[derive(Debug)]
pub struct CVarDescriptor {
    /// Unique CVar name.
    pub name: String,
    /// Declared type.
    pub ty: CVarType,
    /// Storage strategy.
    pub binding: DescriptorBinding,
}

impl CVarDescriptor {
    /// Describe a value-backed CVar with a default.
    pub fn value(name: impl Into<String>, ty: CVarType, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            binding: DescriptorBinding::Default(default.into()),
        }
    }

    /// Describe a delegate-backed CVar with no accessors attached yet.
    pub fn delegate(name: impl Into<String>, ty: CVarType) -> Self {
        Self {
            name: name.into(),
            ty,
            binding: DescriptorBinding::Accessors {
                getter: None,
                setter: None,
                initial: None,
            },
        }
    }

    /// Describe a delegate-backed CVar with both accessors.
    pub fn accessors<G, S>(name: impl Into<String>, ty: CVarType, getter: G, setter: S) -> Self
    where
        G: Fn() -> String + Send + Sync + 'static,
        S: Fn(&str) + Send + Sync + 'static,
    {
        Self::delegate(name, ty).getter(getter).setter(setter)
    }

    /// Attach a getter. Turns a value descriptor into a delegate descriptor.
    pub fn getter<G>(mut self, getter: G) -> Self
    where
        G: Fn() -> String + Send + Sync + 'static,
    {
        self.make_delegate();
        if let DescriptorBinding::Accessors { getter: slot, .. } = &mut self.binding {
            *slot = Some(Box::new(getter));
        }
        self
    }

    /// Attach a setter. Turns a value descriptor into a delegate descriptor.
    pub fn setter<S>(mut self, setter: S) -> Self
    where
        S: Fn(&str) + Send + Sync + 'static,
    {
        self.make_delegate();
        if let DescriptorBinding::Accessors { setter: slot, .. } = &mut self.binding {
            *slot = Some(Box::new(setter));
        }
        self
    }

    /// Set a value to apply after registration.
    ///
    /// For value descriptors this replaces the default.
    pub fn initial(mut self, value: impl Into<String>) -> Self {
        match &mut self.binding {
            DescriptorBinding::Default(default) => *default = value.into(),
            DescriptorBinding::Accessors { initial, .. } => *initial = Some(value.into()),
        }
        self
    }

    /// A declared default is kept as the initial value.
    fn make_delegate(&mut self) {
        if let DescriptorBinding::Default(default) = &mut self.binding {
            let initial = Some(std::mem::take(default));
            self.binding = DescriptorBinding::Accessors {
                getter: None,
                setter: None,
                initial,
            };
        }
    }
}

/// Outcome of a declarative registration pass.
#[derive(Debug, Default)]
pub struct DeclaredReport {
    /// Names registered, in descriptor order.
    pub registered: Vec<String>,
    /// Descriptors that were skipped, with the reason.
    pub skipped: Vec<(String, ConsoleError)>,
}

impl DeclaredReport {
    /// Check if every descriptor was registered.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl CVarRegistry {
    /// Register a batch of declared CVars.
    ///
    /// Each descriptor follows the same rules as direct registration
    /// (unique name, known type, convertible default). Failing descriptors
    /// are skipped and listed in the returned report.
    pub fn register_declared(
        &mut self,
        descriptors: impl IntoIterator<Item = CVarDescriptor>,
    ) -> DeclaredReport {
        let mut report = DeclaredReport::default();

        for descriptor in descriptors {
            let name = descriptor.name.clone();
            match self.apply_descriptor(descriptor) {
                Ok(()) => report.registered.push(name),
                Err(e) => {
                    warn!("Console: skipping declared variable '{}': {}", name, e);
                    report.skipped.push((name, e));
                }
            }
        }

        info!(
            "Console: registered {} declared variables ({} skipped)",
            report.registered.len(),
            report.skipped.len()
        );
        report
    }

    fn apply_descriptor(&mut self, descriptor: CVarDescriptor) -> ConsoleResult<()> {
        let CVarDescriptor { name, ty, binding } = descriptor;

        match binding {
            DescriptorBinding::Default(default) => self.register_value(&name, ty, &default),
            DescriptorBinding::Accessors { getter, setter, initial } => {
                let getter = getter.ok_or_else(|| ConsoleError::binding(&name, "missing getter"))?;
                let setter = setter.ok_or_else(|| ConsoleError::binding(&name, "missing setter"))?;

                self.check_new(&name, &ty)?;
                let initial = initial
                    .map(|value| self.canonicalize(&name, &ty, &value))
                    .transpose()?;

                self.register_cell(&name, CVarCell::from_boxed(ty, getter, setter))?;
                if let Some(value) = initial {
                    self.write_string(&name, &value)?;
                }
                Ok(())
            }
        }
    }
}
