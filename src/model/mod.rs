pub mod attendance;
pub mod compensation;
pub mod slip;
pub mod staff;
