pub mod employee;
pub mod field;
