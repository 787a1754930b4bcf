mod clock;
mod engine;
mod phase;
mod runtime;

pub use clock::Clock;
pub use engine::{format_clock, SessionEngine, SessionState};
pub use phase::{duration_of, next_phase, Phase, CYCLE_LENGTH};
pub use runtime::{Command, RuntimeSnapshot, SessionHandle, SessionRuntime};
