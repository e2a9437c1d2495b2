//! Domain layer containing business entities and contracts.
//!
//! Nothing here depends on the HTTP or storage layers.
//!
//! - [`entities`] - Link record and its insert/patch forms
//! - [`repositories`] - Link store trait implemented by the infrastructure layer
//! - [`click_event`] - Click counting event
//! - [`click_worker`] - Background worker applying click increments
//!
//! # Click Processing Flow
//!
//! 1. [`crate::application::services::Resolver`] resolves a code
//! 2. A [`click_event::ClickEvent`] is queued on a bounded channel
//! 3. [`click_worker::run_click_worker`] applies the increment with retry
//! 4. The counter is updated via [`repositories::LinkRepository::increment_click_count`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
