//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! - [`services::allocator::CodeAllocator`] - Unique short code allocation
//! - [`services::link_service::LinkService`] - Link lifecycle management
//! - [`services::resolver::Resolver`] - Code resolution and click counting

pub mod services;
