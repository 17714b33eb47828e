//! Charts module - chart descriptors and the builders that produce them

pub mod builders;
pub mod descriptor;

pub use descriptor::{ChartDescriptor, ChartKind};
