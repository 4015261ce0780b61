mod clock;
mod session_rng;

pub mod snake;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session_rng::SessionRng;
