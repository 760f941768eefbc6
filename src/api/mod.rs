pub mod compose;
pub mod form;
pub mod jpeg;
pub mod resize;

pub use compose::{handle_compose, ComposeForm, __path_handle_compose};
pub use jpeg::{handle_jpeg, JpegForm, __path_handle_jpeg};
pub use resize::{handle_resize, ResizeForm, __path_handle_resize};
