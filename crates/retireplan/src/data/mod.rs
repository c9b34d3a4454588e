//! Scenario files and their conversion to engine configs

pub mod convert;
pub mod scenario_data;

pub use convert::ConvertError;
pub use scenario_data::ScenarioData;
