//! Column descriptors for the node table
//!
//! A column is a plain record that points at named pure functions:
//!
//! - an **accessor** projecting a [`NodeSnapshot`] to a [`RawValue`] (the sort key)
//! - an optional **formatter** turning the raw value into display text
//! - an optional **classifier** assigning a [`Severity`]
//! - an optional **link** builder (block explorer URLs)
//!
//! The full set of columns lives in a static registry ([`registry()`]); its
//! order is the default column order. A [`ColumnLayout`] is the subset of
//! columns currently shown, in display order, and is what rows are computed
//! against.
//!
//! # Context
//!
//! Several cells depend on values outside the node itself: the chain head
//! (block lag) and the current time (block age). These are captured once per
//! materialization pass in a [`Context`] so that every cell computed in that
//! pass sees the same instant.

mod registry;

pub use registry::{find, primary_column, registry, tiebreak_column};

use crate::error::{NetStatsError, Result};
use crate::format::Severity;
use crate::types::NodeSnapshot;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Values computed once per materialization pass and shared by every cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Context {
    /// Current chain head block number, if known
    pub head_block: Option<u64>,
    /// Wall-clock time of the pass (unix ms)
    pub now_ms: i64,
}

/// What a formatter/classifier can see besides the raw value
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub context: &'a Context,
    pub node: &'a NodeSnapshot,
    /// Block explorer base URL, when configured
    pub explorer: Option<&'a str>,
}

/// The value a column extracts from a node, used for sorting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
}

impl RawValue {
    pub fn from_bool(flag: bool) -> Self {
        RawValue::Number(if flag { 1.0 } else { 0.0 })
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view where missing or non-numeric data reads as NaN
    pub fn number_or_nan(&self) -> f64 {
        self.as_f64().unwrap_or(f64::NAN)
    }

    /// Zero, NaN, empty text and missing values are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Number(n) => *n != 0.0 && !n.is_nan(),
            RawValue::Text(s) => !s.is_empty(),
            RawValue::Missing => false,
        }
    }

    /// Sort comparison.
    ///
    /// Missing values and NaN compare as negative infinity, numbers sort
    /// before text, and text compares lexicographically. Equal keys return
    /// `Ordering::Equal` so stable sorts keep their existing order.
    pub fn sort_cmp(&self, other: &RawValue) -> Ordering {
        match (self, other) {
            (RawValue::Text(a), RawValue::Text(b)) => a.cmp(b),
            (RawValue::Text(_), _) => Ordering::Greater,
            (_, RawValue::Text(_)) => Ordering::Less,
            (a, b) => a.sort_number().total_cmp(&b.sort_number()),
        }
    }

    fn sort_number(&self) -> f64 {
        match self {
            RawValue::Number(n) if !n.is_nan() => *n,
            _ => f64::NEG_INFINITY,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => f.write_str(s),
            RawValue::Missing => Ok(()),
        }
    }
}

/// How the view should align and compare a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Number,
    Text,
}

pub type AccessorFn = fn(&NodeSnapshot, &Context) -> RawValue;
pub type ShowFn = fn(&RawValue, &CellContext<'_>) -> String;
pub type ColorFn = fn(&RawValue, &CellContext<'_>) -> Severity;
pub type LinkFn = fn(&RawValue, &CellContext<'_>) -> Option<String>;

/// One column of the node table
pub struct Column {
    pub name: &'static str,
    /// Icon identifier for the header
    pub icon: &'static str,
    pub kind: ColumnKind,
    /// Shown when the user has not picked columns
    pub visible: bool,
    /// Initial active sort column
    pub primary: bool,
    /// Secondary sort column used to break ties
    pub tiebreak: bool,
    pub accessor: AccessorFn,
    pub show: Option<ShowFn>,
    pub color: Option<ColorFn>,
    pub link: Option<LinkFn>,
    /// Free-form hints for the view
    pub variants: &'static [&'static str],
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("visible", &self.visible)
            .field("primary", &self.primary)
            .field("tiebreak", &self.tiebreak)
            .finish_non_exhaustive()
    }
}

/// A computed table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub raw: RawValue,
    pub value: String,
    pub style: Option<Severity>,
    pub link: Option<String>,
    pub variants: &'static [&'static str],
}

impl Column {
    /// Extract the raw value for `node`
    pub fn value(&self, node: &NodeSnapshot, context: &Context) -> RawValue {
        (self.accessor)(node, context)
    }

    /// Compute the full cell for `node`
    pub fn cell(&self, node: &NodeSnapshot, cx: &CellContext<'_>) -> Cell {
        let raw = self.value(node, cx.context);
        let value = match self.show {
            Some(show) => show(&raw, cx),
            None => raw.to_string(),
        };
        let style = self.color.map(|color| color(&raw, cx));
        let link = self.link.and_then(|link| link(&raw, cx));
        Cell {
            raw,
            value,
            style,
            link,
            variants: self.variants,
        }
    }
}

/// The visible columns in display order
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    columns: Vec<&'static Column>,
    explorer: Option<String>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            columns: registry().iter().filter(|c| c.visible).collect(),
            explorer: None,
        }
    }
}

impl PartialEq for ColumnLayout {
    fn eq(&self, other: &Self) -> bool {
        self.explorer == other.explorer && self.names().eq(other.names())
    }
}

impl ColumnLayout {
    /// Build a layout from column names (case-insensitive).
    ///
    /// An empty list yields the default layout.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Ok(Self::default());
        }
        let columns = names
            .iter()
            .map(|name| {
                find(name.as_ref())
                    .ok_or_else(|| NetStatsError::UnknownColumn(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            columns,
            explorer: None,
        })
    }

    /// Attach a block explorer base URL for address links
    pub fn with_explorer(mut self, explorer: Option<String>) -> Self {
        self.explorer = explorer.map(|url| url.trim_end_matches('/').to_string());
        self
    }

    pub fn explorer(&self) -> Option<&str> {
        self.explorer.as_deref()
    }

    pub fn columns(&self) -> &[&'static Column] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the named column in this layout (case-insensitive)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }
}
