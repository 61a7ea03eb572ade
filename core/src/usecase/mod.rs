pub mod editor;
pub mod scheduler;
pub mod yearly;

#[cfg(test)]
mod yearly_test;
