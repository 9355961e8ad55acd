pub mod payroll;
pub mod slips;
