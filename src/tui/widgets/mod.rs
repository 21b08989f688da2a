pub mod input_buffer;
pub mod step_indicator;

pub use input_buffer::InputBuffer;
pub use step_indicator::StepIndicator;
