/// Authentication primitives
///
/// Identity reaches every handler as an [`AuthUser`] extracted from a JWT
/// bearer token; the domain services below the routing layer never
/// re-derive who is calling.
pub mod extract;
pub mod jwt;
pub mod password;

pub use extract::AuthUser;
pub use jwt::JwtConfig;
