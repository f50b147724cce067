// CONTROLLER: Input, gameplay components and the update loop
pub mod deferred;
pub mod frame_loop;
pub mod input;
pub mod locomotion;
pub mod pause;
pub mod session;
pub mod weapon;

pub use frame_loop::{FrameLoopContext, SceneState, UiAction};
pub use input::{InputAction, InputDispatcher, InputEvent, InputState, KeyBindings, MouseButton};
pub use locomotion::LocomotionController;
pub use pause::{CursorMode, PauseController};
pub use session::{GameClock, Session};
pub use weapon::{ShotReport, WeaponController, WeaponPhase};
