pub mod aircraft;
pub mod notify;
pub mod resilience;
pub mod storage;
