pub mod thought;

pub use thought::{NewThought, ThoughtRecord, UpdateAck};
