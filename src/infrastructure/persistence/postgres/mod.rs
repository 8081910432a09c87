pub mod role_repository;
pub mod user_repository;
pub mod verification_code_repository;

pub use role_repository::PostgresRoleRepository;
pub use user_repository::PostgresUserRepository;
pub use verification_code_repository::PostgresVerificationCodeStore;
