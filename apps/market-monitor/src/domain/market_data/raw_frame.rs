//! Raw tabular response as delivered by a price provider.

use std::fmt;

use chrono::NaiveDate;

/// Column label of a raw frame.
///
/// Providers label columns either with a single name (`"Close"`) or with a
/// multi-level key such as `("Close", "RHM.DE")` when they group fields per
/// symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnLabel {
    /// Single-level label.
    Flat(String),
    /// Multi-level label, outermost level first.
    Nested(Vec<String>),
}

impl ColumnLabel {
    /// Single-level label.
    pub fn flat(name: impl Into<String>) -> Self {
        Self::Flat(name.into())
    }

    /// Multi-level label from its levels, outermost first.
    pub fn nested<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Nested(levels.into_iter().map(Into::into).collect())
    }

    /// The label reduced to its outermost level.
    #[must_use]
    pub fn first_level(&self) -> Option<&str> {
        match self {
            Self::Flat(name) => Some(name.as_str()),
            Self::Nested(levels) => levels.first().map(String::as_str),
        }
    }

    /// Whether this label has more than one level.
    #[must_use]
    pub const fn is_nested(&self) -> bool {
        matches!(self, Self::Nested(_))
    }
}

impl fmt::Display for ColumnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat(name) => f.write_str(name),
            Self::Nested(levels) => write!(f, "({})", levels.join(", ")),
        }
    }
}

/// One raw column; `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    /// Column label.
    pub label: ColumnLabel,
    /// Values aligned with the frame index.
    pub values: Vec<Option<f64>>,
}

/// Column-oriented raw price table keyed by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPriceFrame {
    /// Row dates.
    pub index: Vec<NaiveDate>,
    /// Columns in provider order.
    pub columns: Vec<RawColumn>,
}

impl RawPriceFrame {
    /// Create a frame with the given row index and no columns.
    #[must_use]
    pub const fn new(index: Vec<NaiveDate>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Append a column.
    #[must_use]
    pub fn with_column(mut self, label: ColumnLabel, values: Vec<Option<f64>>) -> Self {
        self.columns.push(RawColumn { label, values });
        self
    }

    /// Number of rows in the index.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    /// Whether the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether any column uses a multi-level label.
    #[must_use]
    pub fn has_nested_columns(&self) -> bool {
        self.columns.iter().any(|c| c.label.is_nested())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_label_reduces_to_outer_level() {
        let label = ColumnLabel::nested(["Close", "RHM.DE"]);
        assert_eq!(label.first_level(), Some("Close"));
        assert_eq!(label.to_string(), "(Close, RHM.DE)");
    }

    #[test]
    fn empty_nested_label_has_no_level() {
        let label = ColumnLabel::Nested(Vec::new());
        assert_eq!(label.first_level(), None);
    }

    #[test]
    fn frame_reports_nested_columns() {
        let frame = RawPriceFrame::new(vec![])
            .with_column(ColumnLabel::flat("Open"), vec![])
            .with_column(ColumnLabel::nested(["Close", "SAP.DE"]), vec![]);
        assert!(frame.has_nested_columns());
        assert!(frame.is_empty());
    }
}
