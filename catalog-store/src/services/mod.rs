//! Catalog services
//!
//! Each service owns a pool handle and receives its collaborators through
//! its constructor.

pub mod certificate_service;
pub mod tag_service;
pub mod user_service;

pub use certificate_service::CertificateService;
pub use tag_service::TagService;
pub use user_service::{UserDirectory, UserService};
