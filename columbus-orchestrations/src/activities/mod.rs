//! Single cluster steps the lifecycle orchestrations are composed of

pub mod check_running;
pub mod delete_app;
pub mod delete_storage;
pub mod deploy_app;
pub mod ensure_storage;
pub mod expose_app;
pub mod wait_for_bound;
