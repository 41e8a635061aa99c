pub mod email;
pub mod local_store;
