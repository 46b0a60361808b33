pub mod collector;
pub mod policy;
pub mod pipeline;
pub mod scheduler;
