//! Request handler module
//!
//! Responsible for request routing dispatch: fixed page routes rendered
//! from templates, favicon and static asset serving, 404 for the rest.

pub mod pages;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
