//! Types that represent the data model, such as `Dataset`, `Classification` and `Percent`.
mod column;
mod dataset;
mod mapping;
mod numeric;
mod percent;
mod selection;
mod timestamp;

pub use column::{Classification, ColumnInfo, ColumnKind};
pub use dataset::{Dataset, Row};
pub use mapping::{Header, Mapping};
pub use numeric::{format_fixed, is_decimal_literal, parse_decimal, FRACTION_DIGITS};
pub(crate) use numeric::{parse_required, Unparsed};
pub use percent::{Adjustments, Percent, PercentInput};
pub use selection::GroupSelection;
pub use timestamp::{is_timestamp, parse_timestamp, start_of_day, DAY_FORMAT};
