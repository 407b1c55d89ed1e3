//! Organization (tenant) entities.

pub mod model;
pub mod plan;

pub use model::{Organization, SecurityPolicy};
pub use plan::{Plan, backfill_organization};
