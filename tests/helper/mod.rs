//! Shared helpers for integration tests

#![allow(dead_code)]

mod resolver;

pub use resolver::*;
