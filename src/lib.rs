//! Provisioning engine for freshly built Linux and Windows systems.
//!
//! A run loads a declarative configuration document, resolves the ordered
//! list of workers for the host OS, prepares the OS-specific directory
//! layout, runs each worker in turn and finally hands off to the reboot
//! command.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: fetch, parse, scope and merge the configuration document
//! - **[`platform`]**: OS detection and the per-OS directory layout
//! - **[`workers`]**: the worker contract, registry, cadence and the yum
//!   repository worker
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `plan`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod download;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod workers;
