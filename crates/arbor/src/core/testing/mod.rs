/// Harness for driving a runner by route.
pub mod harness;
