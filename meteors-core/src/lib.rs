pub mod constants;
pub mod error;
pub mod geom;
pub mod input;
pub mod rng;
pub mod sim;

pub use error::RuleCode;
pub use input::{decode_input_byte, encode_input_byte, FrameInput, INPUT_MASK};
pub use sim::{replay, ExitReason, GameplaySession, RunResult, SessionConfig, WorldSnapshot};
