//! # lostfound-worker
//!
//! Background processing for the lost & found service: the match trigger
//! that runs the candidate matcher for every reported item, and the cron
//! scheduler that keeps the monthly metrics snapshot fresh.

pub mod scheduler;
pub mod trigger;

pub use scheduler::CronScheduler;
pub use trigger::MatchTrigger;
