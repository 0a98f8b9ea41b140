//! Generate GitHub contribution streak cards as SVG, PNG, or JSON.
//!
//! The core is a pair of pure subsystems: [`stats`] turns per-day activity
//! records into streak statistics, and [`card`] renders those statistics
//! into a themeable vector card. Everything else (the GraphQL fetch, the
//! HTTP route, PNG rasterization) is request-scoped glue around them.

pub mod card;
pub mod date;
pub mod error;
pub mod github;
pub mod icons;
pub mod locale;
pub mod png;
pub mod server;
pub mod stats;
pub mod theme;
pub mod wrap;

pub use error::{Error, Result};
