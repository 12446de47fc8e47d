// ABOUTME: Admin client library for job postings, services, testimonials and contacts
// ABOUTME: Generic CRUD client and list/edit controller configured per resource

pub mod config;
pub mod controller;
pub mod draft;
pub mod error;
pub mod filter;
pub mod logging;
pub mod notice;
pub mod remote;
pub mod resource;
pub mod slug;

pub use controller::{ListController, Outcome};
pub use draft::{ArrayField, Draft};
pub use error::{ClientError, DraftError};
pub use resource::Resource;
pub use slug::generate_slug;
