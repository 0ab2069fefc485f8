//! Declared CVar types and their string conversions.
//!
//! Every CVar stores a canonical string. The [`ConversionTable`] maps each
//! declared [`CVarType`] to a parse function that validates a candidate string
//! and returns its canonical form. Typed access goes through [`CVarValue`].

use std::collections::HashMap;
use std::fmt::{self, Display};

/// Semantic type tag of a CVar.
///
/// The tag only decides which conversion validates writes; storage is always
/// a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "declare", derive(serde::Serialize, serde::Deserialize))]
pub enum CVarType {
    /// Signed integer (validated as `i64`).
    Integer,
    /// Floating point (validated as `f64`).
    Float,
    /// Arbitrary text.
    String,
    /// Boolean, canonically `1` or `0`.
    Boolean,
    /// Host-defined type, looked up by name in the conversion table.
    Custom(String),
}

impl CVarType {
    /// Create a custom type tag.
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Get the display name of this type.
    pub fn name(&self) -> &str {
        match self {
            CVarType::Integer => "integer",
            CVarType::Float => "float",
            CVarType::String => "string",
            CVarType::Boolean => "boolean",
            CVarType::Custom(name) => name,
        }
    }
}

impl Display for CVarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for Rust types that can be read from and written to a CVar.
///
/// Implemented for `bool`, `i32`, `i64`, `f32`, `f64` and `String`.
/// Custom types implement it with a [`CVarType::Custom`] tag and register
/// themselves with [`ConversionTable::register_value`].
pub trait CVarValue: Sized + Send + Sync + 'static {
    /// The declared type used when registering a CVar of this Rust type.
    fn cvar_type() -> CVarType;

    /// Parse a value from a string.
    fn parse(s: &str) -> Option<Self>;

    /// Format the value as a string.
    fn format(&self) -> String;
}

impl CVarValue for bool {
    fn cvar_type() -> CVarType {
        CVarType::Boolean
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    fn format(&self) -> String {
        if *self { "1".to_string() } else { "0".to_string() }
    }
}

impl CVarValue for i32 {
    fn cvar_type() -> CVarType {
        CVarType::Integer
    }

    fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl CVarValue for i64 {
    fn cvar_type() -> CVarType {
        CVarType::Integer
    }

    fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

/// Parse a float, rejecting finite input that overflows to infinity.
fn parse_float<F: std::str::FromStr + Into<f64> + Copy>(s: &str) -> Option<F> {
    let value: F = s.parse().ok()?;
    let spelled_infinite = s
        .trim_start_matches(['+', '-'])
        .to_ascii_lowercase()
        .starts_with("inf");
    if value.into().is_infinite() && !spelled_infinite {
        return None;
    }
    Some(value)
}

impl CVarValue for f32 {
    fn cvar_type() -> CVarType {
        CVarType::Float
    }

    fn parse(s: &str) -> Option<Self> {
        parse_float(s)
    }

    fn format(&self) -> String {
        // Avoid unnecessary decimal places
        if self.fract() == 0.0 {
            format!("{:.0}", self)
        } else {
            format!("{}", self)
        }
    }
}

impl CVarValue for f64 {
    fn cvar_type() -> CVarType {
        CVarType::Float
    }

    fn parse(s: &str) -> Option<Self> {
        parse_float(s)
    }

    fn format(&self) -> String {
        if self.fract() == 0.0 {
            format!("{:.0}", self)
        } else {
            format!("{}", self)
        }
    }
}

impl CVarValue for String {
    fn cvar_type() -> CVarType {
        CVarType::String
    }

    fn parse(s: &str) -> Option<Self> {
        Some(s.to_string())
    }

    fn format(&self) -> String {
        self.clone()
    }
}

/// Validates a string and returns its canonical form.
pub type ParseFn = fn(&str) -> Option<String>;

/// Canonicalize a string through a [`CVarValue`] parse/format pair.
pub fn canonical<T: CVarValue>(s: &str) -> Option<String> {
    T::parse(s).map(|value| value.format())
}

/// Per-type conversion table.
///
/// Registries reject variables whose declared type is missing here at
/// registration time, so conversions never fail for lack of a converter.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::{ConversionTable, CVarType};
///
/// let table = ConversionTable::standard();
/// assert_eq!(table.canonicalize(&CVarType::Float, "2.50"), Some("2.5".to_string()));
/// assert_eq!(table.canonicalize(&CVarType::Integer, "abc"), None);
/// ```
#[derive(Debug, Clone)]
pub struct ConversionTable {
    parsers: HashMap<CVarType, ParseFn>,
}

impl Default for ConversionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ConversionTable {
    /// Create a table with no conversions at all.
    pub fn empty() -> Self {
        Self { parsers: HashMap::new() }
    }

    /// Create a table with the four built-in types.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.register(CVarType::Integer, canonical::<i64>);
        table.register(CVarType::Float, canonical::<f64>);
        table.register(CVarType::String, canonical::<String>);
        table.register(CVarType::Boolean, canonical::<bool>);
        table
    }

    /// Register a parse function for a type.
    ///
    /// Returns `true` if the type was newly registered, `false` if it replaced
    /// an existing conversion.
    pub fn register(&mut self, ty: CVarType, parse: ParseFn) -> bool {
        self.parsers.insert(ty, parse).is_none()
    }

    /// Register the conversion for a [`CVarValue`] type under its own tag.
    pub fn register_value<T: CVarValue>(&mut self) -> bool {
        self.register(T::cvar_type(), canonical::<T>)
    }

    /// Check if a type has a conversion.
    pub fn contains(&self, ty: &CVarType) -> bool {
        self.parsers.contains_key(ty)
    }

    /// Get the parse function for a type.
    pub fn get(&self, ty: &CVarType) -> Option<ParseFn> {
        self.parsers.get(ty).copied()
    }

    /// Validate `value` as `ty` and return its canonical string.
    ///
    /// Returns `None` if the type is unknown or the value does not parse.
    pub fn canonicalize(&self, ty: &CVarType, value: &str) -> Option<String> {
        self.get(ty).and_then(|parse| parse(value))
    }
}
