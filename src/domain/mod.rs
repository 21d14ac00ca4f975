pub mod candidate;
pub mod company;
pub mod job;
pub mod skill;
pub mod user;
