//! Domain types for StrategX

pub mod bar;
pub mod series;

pub use bar::{BarError, PriceBar};
pub use series::PriceSeries;

/// One derived numeric value per bar; `None` marks "undefined", never zero.
pub type Column = Vec<Option<f64>>;

/// One derived flag per bar; `None` marks "undefined".
pub type FlagColumn = Vec<Option<bool>>;
