pub mod slips;
