//! Errors are `anyhow::Error` throughout, with context added at each I/O and HTTP step.

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
