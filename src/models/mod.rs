pub mod application;
pub mod company;
pub mod job;
pub mod query;
