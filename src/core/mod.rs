pub mod arith;
mod engine;
mod error;
pub mod faq;
pub mod fraction;
pub mod paint;
pub mod percentage;
pub mod salary;
mod types;
pub mod wellness;

pub use engine::{run_projection, run_projection_with_policy, run_what_if_scenarios, validate_plan};
pub use error::CalcError;
pub use types::{
    CatchUpBasis, Projection, ProjectionPolicy, ProjectionSummary, RetirementPlan, WhatIfKind,
    WhatIfScenario, YearlyProjection,
};
