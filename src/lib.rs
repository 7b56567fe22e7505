//! Chimera: a distributed training/inference coordinator. A master
//! process bootstraps a fleet of worker containers and drives either a
//! bagging ensemble or a synchronous parameter-server SGD fit across
//! them over HTTP.

pub mod bootstrap;
pub mod chimera;
pub mod config;
pub mod csv;
pub mod error;
pub mod http_client;
pub mod master;
pub mod models;
pub mod orchestrator;
pub mod scalar;
pub mod worker;

pub use chimera::{Chimera, Strategy};
pub use error::AppError;
