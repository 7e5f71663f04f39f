//! Column Module
//!
//! Typed, fixed-size column storage.
//!
//! ## Responsibilities
//! - Closed set of column types with stable on-disk tags
//! - Capability set deciding which types a table accepts
//! - Borrowed input values for inserts and predicates
//! - One fixed array per column, indexed by row slot
//!
//! ## Type Tags
//! ```text
//! ┌─────────┬─────┬────────────────────────────┐
//! │ Type    │ Tag │ Storage (per slot)         │
//! ├─────────┼─────┼────────────────────────────┤
//! │ Int     │  0  │ i32                        │
//! │ Text    │  1  │ [u8; MAX_TEXT_LEN]         │
//! │ Bool    │  2  │ bool                       │
//! │ Float   │  3  │ f32                        │
//! │ Double  │  4  │ f64                        │
//! │ Pointer │  5  │ Handle (usize)             │
//! └─────────┴─────┴────────────────────────────┘
//! ```

mod fixed;
mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

pub use fixed::FixedStr;
pub use store::{Column, ColumnData};
pub(crate) use store::Cell;

/// Name buffer used for tables and columns
pub type Name = FixedStr<{ crate::limits::MAX_NAME_LEN }>;

/// Text cell buffer
pub type Text = FixedStr<{ crate::limits::MAX_TEXT_LEN }>;

// =============================================================================
// Column Types
// =============================================================================

/// Type tag of a column, fixed for the column's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Int,
    Text,
    Bool,
    Float,
    Double,
    Pointer,
}

impl ColumnType {
    pub const ALL: [ColumnType; 6] = [
        ColumnType::Int,
        ColumnType::Text,
        ColumnType::Bool,
        ColumnType::Float,
        ColumnType::Double,
        ColumnType::Pointer,
    ];

    /// Tag written to snapshots
    pub fn tag(self) -> i32 {
        match self {
            ColumnType::Int => 0,
            ColumnType::Text => 1,
            ColumnType::Bool => 2,
            ColumnType::Float => 3,
            ColumnType::Double => 4,
            ColumnType::Pointer => 5,
        }
    }

    pub fn from_tag(tag: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.tag() == tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Text => "text",
            ColumnType::Bool => "bool",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::Pointer => "pointer",
        }
    }

    /// Types whose range operators are honored by linear scans
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float | ColumnType::Double)
    }

    /// Types a sort index can order
    pub fn is_sortable(self) -> bool {
        self.is_numeric() || self == ColumnType::Text
    }

    /// Whether the build compiled support for this type
    pub fn compiled_in(self) -> bool {
        match self {
            ColumnType::Int | ColumnType::Bool => true,
            ColumnType::Text => cfg!(feature = "text"),
            ColumnType::Float => cfg!(feature = "float"),
            ColumnType::Double => cfg!(feature = "double"),
            ColumnType::Pointer => cfg!(feature = "pointer"),
        }
    }

    fn bit(self) -> u8 {
        1 << self.tag()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Capability Set
// =============================================================================

/// Set of column types a table accepts at its entry points.
///
/// This is the single place where enabled/disabled types are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSet {
    bits: u8,
}

impl TypeSet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Every type compiled into this build
    pub fn compiled() -> Self {
        ColumnType::ALL
            .into_iter()
            .filter(|ty| ty.compiled_in())
            .fold(Self::empty(), |set, ty| Self { bits: set.bits | ty.bit() })
    }

    pub fn contains(self, column_type: ColumnType) -> bool {
        self.bits & column_type.bit() != 0
    }

    /// Add a type; types the build left out are never added
    pub fn with(self, column_type: ColumnType) -> Self {
        if column_type.compiled_in() {
            Self { bits: self.bits | column_type.bit() }
        } else {
            self
        }
    }

    pub fn without(self, column_type: ColumnType) -> Self {
        Self { bits: self.bits & !column_type.bit() }
    }

    pub fn intersect(self, other: TypeSet) -> Self {
        Self { bits: self.bits & other.bits }
    }

    pub fn iter(self) -> impl Iterator<Item = ColumnType> {
        ColumnType::ALL.into_iter().filter(move |ty| self.contains(*ty))
    }

    /// Reject a column type outside the set
    pub fn check(self, column_type: ColumnType) -> Result<()> {
        if self.contains(column_type) {
            Ok(())
        } else {
            Err(TableError::Unsupported(format!(
                "column type {} is not enabled",
                column_type
            )))
        }
    }
}

impl Default for TypeSet {
    fn default() -> Self {
        Self::compiled()
    }
}

// =============================================================================
// Values
// =============================================================================

/// Opaque pointer-sized handle stored in `Pointer` columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(pub usize);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A typed cell value, borrowed from the caller
///
/// Inserts take one value per declared column and predicates take one value
/// for the filtered column. The variant must match the column's type;
/// `Null` is accepted only for Text (empty string) and Bool (false).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Null,
    Int(i32),
    Text(&'a str),
    Bool(bool),
    Float(f32),
    Double(f64),
    Pointer(Handle),
}

impl<'a> Value<'a> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Pointer(_) => "pointer",
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(*s),
            _ => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Pointer(h) => write!(f, "{}", h),
        }
    }
}

impl From<i32> for Value<'_> {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value<'_> {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<Handle> for Value<'_> {
    fn from(h: Handle) -> Self {
        Value::Pointer(h)
    }
}

// =============================================================================
// Column Specs
// =============================================================================

/// Column declaration passed to table initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec<'a> {
    pub name: &'a str,
    pub column_type: ColumnType,
}

impl<'a> ColumnSpec<'a> {
    pub fn new(name: &'a str, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }

    pub fn int(name: &'a str) -> Self {
        Self::new(name, ColumnType::Int)
    }

    pub fn text(name: &'a str) -> Self {
        Self::new(name, ColumnType::Text)
    }

    pub fn bool(name: &'a str) -> Self {
        Self::new(name, ColumnType::Bool)
    }

    pub fn float(name: &'a str) -> Self {
        Self::new(name, ColumnType::Float)
    }

    pub fn double(name: &'a str) -> Self {
        Self::new(name, ColumnType::Double)
    }

    pub fn pointer(name: &'a str) -> Self {
        Self::new(name, ColumnType::Pointer)
    }
}
