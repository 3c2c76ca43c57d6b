use serde::{Deserialize, Serialize};

/// The columns chosen for grouping, in the order they were chosen. Selecting a column that is
/// already selected removes it.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSelection(Vec<String>);

impl GroupSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column` to the end of the selection, or removes it if it is already selected.
    /// Returns true if the column is selected afterwards.
    pub fn toggle(&mut self, column: &str) -> bool {
        match self.0.iter().position(|c| c == column) {
            Some(ix) => {
                let _ = self.0.remove(ix);
                false
            }
            None => {
                self.0.push(column.to_string());
                true
            }
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.iter().any(|c| c == column)
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
