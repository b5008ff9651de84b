pub mod dashboard;
pub mod employee;
pub mod summary;
pub mod transfer;
