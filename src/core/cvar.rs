//! Variable cells and typed accessor handles.
//!
//! A [`CVarCell`] is what the registry stores: a declared type plus either its
//! own canonical string or a getter/setter pair owned by the host. A [`CVar`]
//! is a cheap, typed handle that names a cell and converts at the boundary.

use std::fmt;
use std::marker::PhantomData;

use super::{CVarRegistry, CVarType, CVarValue, ConsoleResult, ParseFn};

/// Produces the current canonical string of a delegate-backed CVar.
pub type CVarGetter = Box<dyn Fn() -> String + Send + Sync>;

/// Applies a validated canonical string to a delegate-backed CVar.
pub type CVarSetter = Box<dyn Fn(&str) + Send + Sync>;

enum CellStorage {
    /// The cell owns its canonical string.
    Value(String),
    /// Every read and write is forwarded to the host.
    Delegate {
        getter: CVarGetter,
        setter: CVarSetter,
    },
}

/// A single registered variable.
pub struct CVarCell {
    ty: CVarType,
    storage: CellStorage,
    /// Conversion of the Rust type the cell was registered with, if narrower
    /// than the declared type (an `i32` CVar is declared `Integer`).
    validator: Option<ParseFn>,
}

impl CVarCell {
    /// Create a cell that stores its own value.
    ///
    /// `canonical` must already be valid for `ty`.
    pub fn value_backed(ty: CVarType, canonical: impl Into<String>) -> Self {
        Self {
            ty,
            storage: CellStorage::Value(canonical.into()),
            validator: None,
        }
    }

    /// Create a cell that proxies through host-supplied delegates.
    pub fn delegate_backed<G, S>(ty: CVarType, getter: G, setter: S) -> Self
    where
        G: Fn() -> String + Send + Sync + 'static,
        S: Fn(&str) + Send + Sync + 'static,
    {
        Self::from_boxed(ty, Box::new(getter), Box::new(setter))
    }

    pub(crate) fn from_boxed(ty: CVarType, getter: CVarGetter, setter: CVarSetter) -> Self {
        Self {
            ty,
            storage: CellStorage::Delegate { getter, setter },
            validator: None,
        }
    }

    /// Validate writes with `parse` instead of the declared type's conversion.
    ///
    /// Typed registrations use this so that, for example, an `i32` CVar
    /// rejects values that only fit an `i64`.
    pub fn with_validator(mut self, parse: ParseFn) -> Self {
        self.validator = Some(parse);
        self
    }

    /// Get the cell-specific validator, if any.
    #[inline]
    pub fn validator(&self) -> Option<ParseFn> {
        self.validator
    }

    /// Get the declared type.
    #[inline]
    pub fn cvar_type(&self) -> &CVarType {
        &self.ty
    }

    /// Check if reads and writes are forwarded to delegates.
    #[inline]
    pub fn is_delegate(&self) -> bool {
        matches!(self.storage, CellStorage::Delegate { .. })
    }

    /// Get the current canonical string.
    pub fn string_value(&self) -> String {
        match &self.storage {
            CellStorage::Value(value) => value.clone(),
            CellStorage::Delegate { getter, .. } => getter(),
        }
    }

    /// Store an already-validated canonical string.
    pub(crate) fn commit(&mut self, canonical: String) {
        match &mut self.storage {
            CellStorage::Value(value) => *value = canonical,
            CellStorage::Delegate { setter, .. } => setter(&canonical),
        }
    }
}

impl fmt::Debug for CVarCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("CVarCell");
        s.field("ty", &self.ty);
        match &self.storage {
            CellStorage::Value(value) => s.field("value", value).finish(),
            CellStorage::Delegate { .. } => s.finish_non_exhaustive(),
        }
    }
}

/// Typed accessor for a registered CVar.
///
/// The handle holds only the name; each access goes through the registry and
/// converts to or from the canonical string.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::{CVar, CVarRegistry};
///
/// let mut registry = CVarRegistry::new();
/// let fov: CVar<i32> = registry.register("cl_fov", 90).unwrap();
///
/// fov.set(&mut registry, 110).unwrap();
/// assert_eq!(fov.get(&registry).unwrap(), 110);
/// assert_eq!(fov.string_value(&registry).unwrap(), "110");
/// ```
pub struct CVar<T> {
    name: Box<str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: CVarValue> CVar<T> {
    /// Create a handle without checking that the CVar exists.
    ///
    /// Accesses fail with [`ConsoleError::NotFound`](super::ConsoleError::NotFound)
    /// until a CVar with this name is registered.
    pub fn lazy(name: impl Into<Box<str>>) -> Self {
        Self {
            name: name.into(),
            _marker: PhantomData,
        }
    }

    /// Create a handle to a CVar that must already be registered.
    pub fn bind(name: impl Into<Box<str>>, registry: &CVarRegistry) -> ConsoleResult<Self> {
        let handle = Self::lazy(name);
        if !registry.contains(&handle.name) {
            return Err(super::ConsoleError::not_found(&*handle.name));
        }
        Ok(handle)
    }

    /// Get the CVar name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the type this handle converts to.
    #[inline]
    pub fn cvar_type(&self) -> CVarType {
        T::cvar_type()
    }

    /// Read the value as `T`.
    pub fn get(&self, registry: &CVarRegistry) -> ConsoleResult<T> {
        registry.lookup(&self.name)
    }

    /// Read the canonical string.
    pub fn string_value(&self, registry: &CVarRegistry) -> ConsoleResult<String> {
        registry.lookup_string(&self.name)
    }

    /// Write a typed value.
    pub fn set(&self, registry: &mut CVarRegistry, value: T) -> ConsoleResult<()> {
        registry.write(&self.name, value)
    }

    /// Write a string, validated against the CVar's declared type.
    pub fn set_string(&self, registry: &mut CVarRegistry, value: &str) -> ConsoleResult<()> {
        registry.write_string(&self.name, value)
    }
}

impl<T> Clone for CVar<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for CVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CVar").field("name", &self.name).finish()
    }
}
