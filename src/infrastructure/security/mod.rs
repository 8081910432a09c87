mod argon2_hasher;
mod code_generator;
mod jwt_issuer;

pub use argon2_hasher::Argon2PasswordHasher;
pub use code_generator::RandomCodeGenerator;
pub use jwt_issuer::JwtTokenIssuer;
