mod engine;
pub mod input;
mod types;

pub use engine::project;
pub use input::{InputError, RiskProfile};
pub use types::{ProjectionInput, ProjectionResult, YearRecord};
