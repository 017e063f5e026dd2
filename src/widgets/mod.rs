//! Built-in widgets: Frame, TextLabel, TextBox, ImageLabel, VideoLabel.

pub mod frame;
pub mod image_label;
pub mod text_box;
pub mod text_label;
pub mod video_label;

pub use frame::Frame;
pub use image_label::ImageLabel;
pub use text_box::{install_editing_actions, remove_editing_actions, TextBox};
pub use text_label::{TextContent, TextLabel};
pub use video_label::VideoLabel;
