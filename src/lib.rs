// src/lib.rs — Library root for docquery

pub mod cli;
pub mod core;
pub mod gateway;
pub mod infra;
pub mod util;
