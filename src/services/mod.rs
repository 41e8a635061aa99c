pub mod dispatcher;
pub mod email_gateway;
pub mod health_service;
pub mod orchestrator;
pub mod rate_limit_service;
pub mod recorder;
pub mod templates;
pub mod validation;
