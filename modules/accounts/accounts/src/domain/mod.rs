pub mod actor;
pub mod error;
pub mod guard;
pub mod service;
pub mod validation;
