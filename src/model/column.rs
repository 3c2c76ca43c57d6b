use serde::{Deserialize, Serialize};

/// The type inferred for a column when a file is loaded.
///
/// The numeric and date rules are evaluated independently, so a column can satisfy both. Such a
/// column is summed like a numeric column and truncated to the day like a date column when it is
/// part of the grouping key.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Neither numeric nor date. Carried through from the first row of each group.
    #[default]
    Categorical,
    /// At least one cell is a decimal literal.
    Numeric,
    /// Every cell is a date or date/time.
    Date,
    /// Both of the above.
    NumericDate,
}

serde_plain::derive_display_from_serialize!(ColumnKind);
serde_plain::derive_fromstr_from_deserialize!(ColumnKind);

impl ColumnKind {
    pub fn from_rules(numeric: bool, date: bool) -> Self {
        match (numeric, date) {
            (true, true) => ColumnKind::NumericDate,
            (true, false) => ColumnKind::Numeric,
            (false, true) => ColumnKind::Date,
            (false, false) => ColumnKind::Categorical,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric | ColumnKind::NumericDate)
    }

    pub fn is_date(&self) -> bool {
        matches!(self, ColumnKind::Date | ColumnKind::NumericDate)
    }
}

/// A column name together with its inferred kind.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    name: String,
    kind: ColumnKind,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }
}

/// The inferred kind of every column of a dataset, in header order.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Classification {
    columns: Vec<ColumnInfo>,
}

impl Classification {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// The kind of the column at `index`, `Categorical` if out of range.
    pub fn kind(&self, index: usize) -> ColumnKind {
        self.columns
            .get(index)
            .map(ColumnInfo::kind)
            .unwrap_or_default()
    }

    /// Names of the numeric columns, in header order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.names_where(ColumnKind::is_numeric)
    }

    /// Names of the date columns, in header order.
    pub fn date_columns(&self) -> Vec<&str> {
        self.names_where(ColumnKind::is_date)
    }

    /// Positions of the numeric columns, in header order.
    pub fn numeric_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind.is_numeric())
            .map(|(ix, _)| ix)
            .collect()
    }

    fn names_where(&self, f: impl Fn(&ColumnKind) -> bool) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| f(&c.kind))
            .map(|c| c.name.as_str())
            .collect()
    }
}
