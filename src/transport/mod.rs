//! Outbound delivery to the remote email service.

pub mod client;

pub use client::TransmissionClient;
