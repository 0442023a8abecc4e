mod query;

pub use query::{QueryPlan, plan_query};
