// ABOUTME: Remote API access module
// ABOUTME: HTTP client, backend record models, service extras and file uploads

pub mod client;
pub mod models;
pub mod services;
pub mod upload;

pub use client::{Ack, CrudApi, RemoteClient, ResourceClient};
pub use models::{Contact, Envelope, Job, Metadata, Service, Testimonial};
pub use services::{ServiceAttachments, ServiceClient};
pub use upload::{HttpUploader, UploadFile, Uploader};
