#[cfg(test)]
pub(crate) mod buffer;
pub mod logging;
