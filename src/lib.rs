//! bitdraw - a software draw device
//!
//! A [`DrawDevice`] owns (or borrows) a packed pixel buffer in one of the
//! [`DisplayMode`] formats and exposes pixel operations in a logical
//! coordinate space. Orientation, integer scaling and a draw origin map
//! logical coordinates onto the physical buffer; draw modes, alpha
//! blending and shadow/fade decide what lands there.
//!
//! ```
//! use bitdraw::{DisplayMode, DrawDevice, DrawMode, Rgb, Size};
//!
//! let mut dev = DrawDevice::new_bitmap(Size::new(4, 4), DisplayMode::Color16MU)?;
//! dev.write_rgb_multi(0, 0, 4, 4, Rgb::RED, DrawMode::PEN);
//! dev.write_rgb_multi(0, 0, 2, 2, Rgb::BLUE, DrawMode::PEN);
//! assert_eq!(dev.read_pixel(3, 3), Rgb::RED);
//! # Ok::<(), bitdraw::DrawError>(())
//! ```

pub mod blend;
pub mod codec;
pub mod color;
pub mod config;
pub mod device;
pub mod draw_mode;
pub mod error;
pub mod format;
pub mod geometry;
pub mod mapper;
pub mod palette;
pub mod screen;
pub mod shadow;

pub use color::Rgb;
pub use config::DeviceConfig;
pub use device::{Capabilities, DrawDevice, Interface};
pub use draw_mode::DrawMode;
pub use error::{ContractViolation, DrawError};
pub use format::DisplayMode;
pub use geometry::{Point, Rect, Size};
pub use mapper::{Orientation, Scaling};
pub use palette::Palette;
pub use screen::{MemoryScreen, ScreenInfo, ScreenSink};
pub use shadow::{FadeParams, ShadowMode};
