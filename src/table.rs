//! Tabulated metadata as handed over by the structure loader.
//!
//! A [`Frame`] is one data block of named categories. Each [`Category`] is a
//! table with named columns and row-major values, the same shape a CIF loop
//! has after parsing. Only the query surface the metric readers need lives
//! here.

use std::fmt;

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A present value, kept as text.
    Str(String),
    /// The inapplicable marker `.`.
    Inapplicable,
    /// The unknown marker `?`.
    Unknown,
}

impl Value {
    /// Returns the string content, or `None` for `.` / `?`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Tries to parse the value as `f64`.
    ///
    /// Handles CIF uncertainty notation like `50.123(4)` by stripping the
    /// parenthesized uncertainty before parsing. `NaN` and infinities are
    /// not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        let s = self.as_str()?;
        let s = match s.find('(') {
            Some(idx) => &s[..idx],
            None => s,
        };
        s.trim().parse().ok().filter(|v: &f64| v.is_finite())
    }

    /// Tries to parse the value as `i32`.
    pub fn as_i32(&self) -> Option<i32> {
        self.as_str()?.trim().parse().ok()
    }

    /// Returns `true` if this is a `Str` value (not `.` or `?`).
    pub fn is_present(&self) -> bool {
        matches!(self, Value::Str(_))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        match s {
            "." => Value::Inapplicable,
            "?" => Value::Unknown,
            _ => Value::Str(s.to_owned()),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        match s.as_str() {
            "." => Value::Inapplicable,
            "?" => Value::Unknown,
            _ => Value::Str(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Inapplicable => f.write_str("."),
            Value::Unknown => f.write_str("?"),
        }
    }
}

/// A named table: column names plus row-major values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category name without the leading underscore (e.g. `ma_qa_metric`).
    pub name: String,
    /// Column names, without the category prefix.
    pub columns: Vec<String>,
    /// Row-major flat array of values. Length = `columns.len() * nrows()`.
    pub values: Vec<Value>,
}

impl Category {
    /// Create an empty category with the given columns.
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            columns: columns.iter().map(|&c| c.to_owned()).collect(),
            values: Vec::new(),
        }
    }

    /// Append one row. Short rows are padded with `?`, long rows truncated.
    pub fn push_row<I, V>(&mut self, row: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let width = self.columns.len();
        let start = self.values.len();
        self.values.extend(row.into_iter().take(width).map(Into::into));
        self.values.resize(start + width, Value::Unknown);
    }

    /// Builder form of [`Category::push_row`].
    #[must_use]
    pub fn with_row<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_row(row);
        self
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        if self.columns.is_empty() {
            0
        } else {
            self.values.len() / self.columns.len()
        }
    }

    /// Find the column index for a name (case-insensitive).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Column accessor, or `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<Column<'_>> {
        let index = self.column_index(name)?;
        Some(Column {
            category: self,
            index,
        })
    }
}

/// A column of a [`Category`], addressed by row.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    category: &'a Category,
    index: usize,
}

impl<'a> Column<'a> {
    /// Value at `row`, `None` when the row is out of range.
    pub fn value(&self, row: usize) -> Option<&'a Value> {
        let stride = self.category.columns.len();
        self.category.values.get(row * stride + self.index)
    }

    /// String content at `row`, `None` for `.`/`?` or out of range.
    pub fn str(&self, row: usize) -> Option<&'a str> {
        self.value(row)?.as_str()
    }

    /// Integer content at `row`.
    pub fn i32(&self, row: usize) -> Option<i32> {
        self.value(row)?.as_i32()
    }

    /// Float content at `row`.
    pub fn f64(&self, row: usize) -> Option<f64> {
        self.value(row)?.as_f64()
    }
}

/// One data block: a named set of categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Block name (`data_NAME` without the prefix).
    pub name: String,
    /// Categories in file order.
    pub categories: Vec<Category>,
}

impl Frame {
    /// Create an empty frame.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            categories: Vec::new(),
        }
    }

    /// Builder: add a category, replacing any with the same name.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.insert(category);
        self
    }

    /// Add a category, replacing any with the same name.
    pub fn insert(&mut self, category: Category) {
        self.categories
            .retain(|c| !c.name.eq_ignore_ascii_case(&category.name));
        self.categories.push(category);
    }

    /// Look up a category by name (case-insensitive, leading `_` ignored).
    pub fn category(&self, name: &str) -> Option<&Category> {
        let name = name.trim_start_matches('_');
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}
