pub mod board;
pub mod scheduler;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;
