pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{Role, User, VerificationCode, VerificationStatus};
pub use errors::{AuthError, HashError, NotificationError, RepositoryError};
pub use value_objects::{Email, Password, PasswordHash, RoleName, Username};
