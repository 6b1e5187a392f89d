//! Service traits the domains consume
//!
//! Domains talk to the media server only through these traits so that the
//! HTTP client can be swapped for stubs in tests.

pub mod media;

pub use media::MediaRepository;
