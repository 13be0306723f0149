//! Batch document generation and delivery.

mod archive;
mod delivery;
mod generator;
mod schedule;

pub use archive::{create_archive, unique_names};
pub use delivery::{Delivery, archive_filename, deliver};
pub use generator::{BatchGenerator, GeneratedDocument};
pub use schedule::{DEFAULT_YIELD_EVERY, ThreadYielder, YieldPolicy, Yielder, drive};
