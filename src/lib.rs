//! GeneAccess - Conversational genetic-disorder risk intake
//!
//! This crate runs a scripted patient interview, normalizes free-text
//! answers into a fixed feature row, scores it with a pre-trained
//! classifier adjusted by symptom-cluster rules, and renders a report.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
