//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Random short codes and alias shape rules
//! - [`url_validator`] - Target URL validation
//! - [`retry`] - Bounded retries for transient store failures
//! - [`deadline`] - Timeouts for store-bound operations

pub mod code_generator;
pub mod deadline;
pub mod retry;
pub mod url_validator;
