//! Period alignment: parsing period keys and ordering them on a common index.

mod period_index;
mod period_model;

pub use period_index::{month_index_for_date, PeriodIndex};
pub use period_model::{month_offset_for_date, PeriodFormat, PeriodKey};
