//! Computer players built on the search driver.

pub mod controller;
pub mod level;

pub use controller::RobotController;
pub use level::RobotLevel;
