//! Coursepay - Course Purchase and Payment Reconciliation Service
//!
//! This crate implements the order/payment lifecycle for purchasing digital
//! course content through a third-party payment provider, reconciling
//! synchronous confirmations and asynchronous webhooks into one consistent
//! order state.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
