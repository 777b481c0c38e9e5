pub mod dashboard;
pub mod forms;
