pub mod email;
pub mod handle;
pub mod locale;
pub mod submission;
