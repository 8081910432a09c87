mod log_gateway;
mod smtp_gateway;

pub use log_gateway::LogNotificationGateway;
pub use smtp_gateway::SmtpNotificationGateway;
