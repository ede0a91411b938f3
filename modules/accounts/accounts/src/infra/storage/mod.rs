//! Storage mapping for accounts.

pub mod entity;
pub mod mapper;
pub mod scope;
pub mod writes;

#[cfg(test)]
mod mapper_test;
