pub mod cache;
pub mod observability;
pub mod progress;
pub mod storage;
pub mod upstream;
