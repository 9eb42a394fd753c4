pub mod dispatcher;
pub mod filter;
pub mod window;

pub use dispatcher::{run_sample_loop, spawn_sample_loop};
pub use filter::LowPassFilter;
pub use window::{CounterMode, WindowManager, WindowStats};
