// VIEW: Surface setup and frame presentation
pub mod gpu_init;
pub mod render;

pub use gpu_init::GpuContext;
pub use render::{clear_color, Backdrop, FrameRenderer};
