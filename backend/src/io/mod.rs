//! # IO Module
//!
//! Transport adapters over the domain services. Only HTTP/JSON exists today.

pub mod rest;
