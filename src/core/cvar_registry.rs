//! Registry of console variables.
//!
//! Every variable is stored as a canonical string behind a [`CVarCell`].
//! Writes are validated through the registry's [`ConversionTable`] before
//! anything is committed, so a failed write never changes a variable.

use std::collections::HashMap;

use bevy::log::{debug, warn};

use super::error::validate_name;
use super::{
    canonical, CVar, CVarCell, CVarType, CVarValue, ConsoleError, ConsoleResult, ConversionTable,
};

/// Central storage for console variables.
///
/// Names are unique; registering an existing name fails with
/// [`ConsoleError::DuplicateName`] and leaves the first registration intact.
/// Enumeration follows registration order.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::CVarRegistry;
///
/// let mut registry = CVarRegistry::new();
/// registry.register("sv_gravity", 800.0f32).unwrap();
///
/// assert_eq!(registry.lookup::<f32>("sv_gravity").unwrap(), 800.0);
/// assert_eq!(registry.lookup_string("sv_gravity").unwrap(), "800");
///
/// // Invalid writes are rejected and leave the value untouched
/// assert!(registry.write_string("sv_gravity", "heavy").is_err());
/// assert_eq!(registry.lookup_string("sv_gravity").unwrap(), "800");
/// ```
#[derive(Debug, Default)]
pub struct CVarRegistry {
    cells: HashMap<Box<str>, CVarCell>,
    /// Registration order, for deterministic enumeration.
    order: Vec<Box<str>>,
    conversions: ConversionTable,
}

impl CVarRegistry {
    /// Create an empty registry with the standard conversion table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with a custom conversion table.
    pub fn with_conversions(conversions: ConversionTable) -> Self {
        Self {
            conversions,
            ..Self::default()
        }
    }

    /// Create a registry holding the default variables.
    ///
    /// - `version`: the crate version (string)
    /// - `cl_playerName`: `"PlayerName"` (string)
    /// - `sensitivity`: `3` (integer)
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        if let Err(e) = registry.register_defaults() {
            warn!("Console: failed to register default variables: {}", e);
        }
        registry
    }

    fn register_defaults(&mut self) -> ConsoleResult<()> {
        self.register("version", env!("CARGO_PKG_VERSION").to_string())?;
        self.register("cl_playerName", "PlayerName".to_string())?;
        self.register("sensitivity", 3i32)?;
        Ok(())
    }

    /// Get the conversion table.
    pub fn conversions(&self) -> &ConversionTable {
        &self.conversions
    }

    /// Get the conversion table mutably, e.g. to add custom types.
    pub fn conversions_mut(&mut self) -> &mut ConversionTable {
        &mut self.conversions
    }

    /// Register a value-backed CVar with an initial value.
    ///
    /// Later writes are validated as `T`, not just as its declared type.
    pub fn register<T: CVarValue>(
        &mut self,
        name: impl Into<Box<str>>,
        initial: T,
    ) -> ConsoleResult<CVar<T>> {
        let name = name.into();
        let ty = T::cvar_type();
        self.check_new(&name, &ty)?;

        let formatted = initial.format();
        let value = canonical::<T>(&formatted)
            .ok_or_else(|| ConsoleError::conversion(&*name, formatted, ty.clone()))?;
        let cell = CVarCell::value_backed(ty, value).with_validator(canonical::<T>);
        self.insert(&name, cell);
        Ok(CVar::lazy(name))
    }

    /// Register the CVar an existing handle points at, holding the default
    /// value of `T`.
    pub fn register_handle<T: CVarValue + Default>(
        &mut self,
        handle: &CVar<T>,
    ) -> ConsoleResult<()> {
        self.register(handle.name(), T::default()).map(|_| ())
    }

    /// Register a value-backed CVar holding the default value of `T`.
    pub fn register_default<T: CVarValue + Default>(
        &mut self,
        name: impl Into<Box<str>>,
    ) -> ConsoleResult<CVar<T>> {
        self.register(name, T::default())
    }

    /// Register a value-backed CVar from a declared type and a string value.
    pub fn register_value(&mut self, name: &str, ty: CVarType, initial: &str) -> ConsoleResult<()> {
        self.check_new(name, &ty)?;
        let canonical = self.canonicalize(name, &ty, initial)?;
        self.insert(name, CVarCell::value_backed(ty, canonical));
        Ok(())
    }

    /// Register a delegate-backed CVar typed by `T`.
    ///
    /// The registry never stores a value for it: reads call `getter` and
    /// validated writes call `setter` with the canonical string.
    pub fn register_delegate<T, G, S>(
        &mut self,
        name: impl Into<Box<str>>,
        getter: G,
        setter: S,
    ) -> ConsoleResult<CVar<T>>
    where
        T: CVarValue,
        G: Fn() -> String + Send + Sync + 'static,
        S: Fn(&str) + Send + Sync + 'static,
    {
        let name = name.into();
        let cell = CVarCell::delegate_backed(T::cvar_type(), getter, setter)
            .with_validator(canonical::<T>);
        self.register_cell(&name, cell)?;
        Ok(CVar::lazy(name))
    }

    /// Register a prepared cell under `name`.
    pub fn register_cell(&mut self, name: &str, cell: CVarCell) -> ConsoleResult<()> {
        self.check_new(name, cell.cvar_type())?;
        self.insert(name, cell);
        Ok(())
    }

    pub(super) fn check_new(&self, name: &str, ty: &CVarType) -> ConsoleResult<()> {
        validate_name(name)?;
        if self.cells.contains_key(name) {
            warn!("Console: variable '{}' is already registered", name);
            return Err(ConsoleError::DuplicateName { name: name.to_string() });
        }
        if !self.conversions.contains(ty) {
            return Err(ConsoleError::UnknownType { ty: ty.clone() });
        }
        Ok(())
    }

    fn insert(&mut self, name: &str, cell: CVarCell) {
        let name: Box<str> = name.into();
        self.order.push(name.clone());
        self.cells.insert(name, cell);
    }

    pub(super) fn canonicalize(&self, name: &str, ty: &CVarType, value: &str) -> ConsoleResult<String> {
        let parse = self
            .conversions
            .get(ty)
            .ok_or_else(|| ConsoleError::UnknownType { ty: ty.clone() })?;
        parse(value).ok_or_else(|| ConsoleError::conversion(name, value, ty.clone()))
    }

    /// Get a cell by name.
    pub fn get_cell(&self, name: &str) -> Option<&CVarCell> {
        self.cells.get(name)
    }

    /// Read a CVar converted to `T`.
    pub fn lookup<T: CVarValue>(&self, name: &str) -> ConsoleResult<T> {
        let value = self.lookup_string(name)?;
        T::parse(&value).ok_or_else(|| ConsoleError::conversion(name, value, T::cvar_type()))
    }

    /// Read the canonical string of a CVar.
    pub fn lookup_string(&self, name: &str) -> ConsoleResult<String> {
        self.cells
            .get(name)
            .map(CVarCell::string_value)
            .ok_or_else(|| ConsoleError::not_found(name))
    }

    /// Write a typed value.
    ///
    /// The formatted value must also be valid for the CVar's declared type.
    pub fn write<T: CVarValue>(&mut self, name: &str, value: T) -> ConsoleResult<()> {
        self.write_string(name, &value.format())
    }

    /// Write a string value.
    ///
    /// The string is validated against the declared type first; on failure the
    /// CVar keeps its previous value.
    pub fn write_string(&mut self, name: &str, value: &str) -> ConsoleResult<()> {
        let (ty, validator) = self
            .cells
            .get(name)
            .map(|cell| (cell.cvar_type().clone(), cell.validator()))
            .ok_or_else(|| ConsoleError::not_found(name))?;
        let canonical = match validator {
            Some(parse) => parse(value).ok_or_else(|| ConsoleError::conversion(name, value, ty))?,
            None => self.canonicalize(name, &ty, value)?,
        };

        debug!("Console: {} = \"{}\"", name, canonical);
        if let Some(cell) = self.cells.get_mut(name) {
            cell.commit(canonical);
        }
        Ok(())
    }

    /// Check if a CVar is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.cells.contains_key(name)
    }

    /// Iterate over CVar names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|name| name.as_ref())
    }

    /// Collect all CVar names in registration order.
    pub fn list_names(&self) -> Vec<String> {
        self.names().map(str::to_string).collect()
    }

    /// Iterate over all cells in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CVarCell)> {
        self.order
            .iter()
            .filter_map(|name| self.cells.get(name).map(|cell| (name.as_ref(), cell)))
    }

    /// Get the number of registered CVars.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no CVars are registered.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
