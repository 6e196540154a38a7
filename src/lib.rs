//! MCOA - Marine Corps Operations Assistant
//!
//! A staff-assistant core: an LLM agent answers operational queries using
//! mock S-1 through S-4 staff tools. Every tool call is observed, attributed
//! to the query run that caused it, counted, and streamed to live dashboard
//! subscribers. The S-3 tools aggregate readiness, logistics, weather, threat
//! and comms into a GO / NO-GO feasibility decision and a decision package.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
