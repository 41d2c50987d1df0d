//! Instrumented example workload for the call-tree timer.

pub mod config;
pub mod workload;
