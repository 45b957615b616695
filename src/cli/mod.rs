//! CLI infrastructure for the maze Q-learning toolkit
//!
//! This module provides the command-line interface for training,
//! benchmarking, and inspecting saved policies.

pub mod commands;
pub mod config;
pub mod output;
