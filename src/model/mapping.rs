use crate::error::{RollupError, RollupResult};
use serde::de::Error as SerdeError;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;

/// The header row of a CSV file: the ordered column names and a lookup from name to position.
/// Column names are unique within a mapping.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Mapping {
    headers: Vec<Header>,
    header_map: HashMap<Header, usize>,
}

impl Mapping {
    /// Create a new `Mapping` from a list of header strings.
    ///
    /// # Errors
    /// - Returns `MalformedFile` if two headers have the same name.
    pub fn new<S, I>(headers: I) -> RollupResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let headers: Vec<Header> = headers.into_iter().map(|s| s.into().into()).collect();
        let mut header_map: HashMap<Header, usize> = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            if header_map.insert(header.clone(), idx).is_some() {
                return Err(RollupError::MalformedFile(format!(
                    "Encountered a duplicate header '{}'",
                    header.as_ref()
                )));
            }
        }

        Ok(Self {
            headers,
            header_map,
        })
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// The position of the column named `header`, if there is one.
    pub fn index_of(&self, header: &str) -> Option<usize> {
        self.header_map.get(header).copied()
    }

    /// Like `index_of`, but an unknown name is an error.
    pub fn require(&self, header: &str) -> RollupResult<usize> {
        self.index_of(header)
            .ok_or_else(|| RollupError::UnknownColumn(header.to_string()))
    }

    /// The column names as string slices, in header order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(|h| h.as_ref())
    }
}

impl Serialize for Mapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.headers.len()))?;
        for header in &self.headers {
            seq.serialize_element(header.as_ref())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Mapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items: Vec<String> = Vec::deserialize(deserializer)?;
        let mapping = Mapping::new(items).map_err(D::Error::custom)?;
        Ok(mapping)
    }
}

/// Represents a column name from the header row of a CSV file, for example, `Unit Price`.
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(String);

impl AsRef<str> for Header {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::borrow::Borrow<str> for Header {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl<S: Into<String>> From<S> for Header {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl FromStr for Header {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}
