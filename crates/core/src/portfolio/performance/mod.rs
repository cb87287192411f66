pub mod calculator;
pub mod performance_model;
pub mod performance_service;
mod performance_traits;


pub use calculator::*;
pub use performance_model::*;
pub use performance_service::PerformanceService;
pub use performance_traits::PerformanceServiceTrait;
