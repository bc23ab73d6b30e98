//! Board drivers and task helpers.

pub mod estop;
pub mod task_pin;
