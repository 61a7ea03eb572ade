pub mod record;
pub mod selection;
pub mod stats;
