//! [`Error`], [`ErrorKind`] and [`Result`].

mod http_error;
mod pg_dashboard;
mod pg_directory;
mod pg_error;
mod service_error;

pub use http_error::{Error, ErrorKind, Result};
