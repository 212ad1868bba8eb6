//! Deterministic assessment engine.
//!
//! Pure, exactly reproducible computations deciding whether joint or
//! individual assessment minimizes a couple's total liability:
//!
//! - **Tariff** (`tariff`): year-keyed progressive income-tax schedules
//! - **Assessment** (`assessment`): medical-expense adjustment,
//!   Progressionsvorbehalt, splitting, and the joint/individual comparator
//! - **Levy** (`levy`): the stepped special church-levy schedule
//! - **Sampler** (`sampler`): stochastic plausible couple inputs

pub mod assessment;
pub mod levy;
pub mod sampler;
pub mod tariff;
