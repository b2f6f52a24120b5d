pub mod config;

pub use config::{PlannerConfig, PlannerConfigError, load_planner_config};
