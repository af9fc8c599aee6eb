//! Property test modules for nira-core.

pub mod cnf_properties;
