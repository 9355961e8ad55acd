pub mod attendance;
pub mod calculator;
pub mod generator;
pub mod period;
pub mod resolver;
