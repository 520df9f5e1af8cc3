mod persistence;
mod source;
mod spatial;

pub use persistence::*;
pub use source::*;
pub use spatial::*;
