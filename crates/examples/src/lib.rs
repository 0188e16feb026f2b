//! Sample applications and a line-oriented driver for arbor.

pub mod counters;
pub mod script;

#[cfg(test)]
mod tests;
