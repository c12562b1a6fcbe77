//! HTTP utility module
//!
//! Response builders, MIME detection, and cache validators shared by the
//! request handlers.

pub mod cache;
pub mod mime;
pub mod response;

pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_cached_response, build_options_response,
};
