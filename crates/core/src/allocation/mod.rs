//! Surplus allocation into goals.

pub mod allocator;
pub mod error;
pub mod types;

pub use allocator::SurplusAllocator;
pub use error::AllocationError;
pub use types::Allocation;
