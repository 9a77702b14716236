//! Weekly timetable allocation: places subject and lab sessions onto a
//! day/period grid without double-booking cells or teachers, then fills the
//! remaining periods with free hours.

pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod filler;
pub mod grid;
pub mod lab;
pub mod ledger;
pub mod regular;
pub mod repository;
pub mod server;
pub mod solver;
pub mod validation;
pub mod workload;

pub use data::{GenerateRequest, Requirement, ScheduleEntry, Timetable};
pub use error::EngineError;
pub use solver::{EngineOptions, generate};
pub use workload::WorkloadValidator;
