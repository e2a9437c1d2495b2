//! Business logic services for the application layer.

pub mod allocator;
pub mod link_service;
pub mod resolver;

pub use allocator::{AllocationSettings, CodeAllocator};
pub use link_service::{LinkPage, LinkService, LinkUpdate};
pub use resolver::{Resolution, Resolver};
