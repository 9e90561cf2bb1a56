pub mod lambda;
pub mod query;
pub mod expression;
pub mod generator;
