//! Component traits and the signal stage.
//!
//! - Indicator trait: bar history in, derived column(s) out
//! - Crossover signal generator: reads derived columns, emits flags and brackets

pub mod indicator;
pub mod signal;

pub use indicator::{defined_count, Indicator};
pub use signal::{
    crosses_above, crosses_below, CrossoverSignals, SignalColumns, SignalEvent, SignalInputs,
    SignalKind,
};
