//! Data models for invoices, suppliers, and configuration.

pub mod config;
pub mod invoice;
pub mod supplier;
