//! ReviewStack core: request validation, query planning and execution.
//!
//! A read flows through [`validator`], [`planner`], [`executor`] and
//! [`shaper`], with [`translate`] as an optional last stage. [`provider`]
//! wires those stages together and [`handler`] exposes the provider to the
//! HTTP layer.
#![allow(missing_docs, clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod executor;
pub mod handler;
pub mod planner;
pub mod provider;
pub mod seed;
pub mod shaper;
pub mod storage;
pub mod translate;
pub mod validator;
