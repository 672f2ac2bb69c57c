//! Identity resolver implementations.

mod http_identity_resolver;
mod static_identity_resolver;

pub use http_identity_resolver::HttpIdentityResolver;
pub use static_identity_resolver::StaticIdentityResolver;
