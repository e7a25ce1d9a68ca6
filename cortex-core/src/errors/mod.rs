mod cortex_error;

pub use cortex_error::{CortexError, CortexResult};
