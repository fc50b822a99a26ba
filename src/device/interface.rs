//! Optional device extensions looked up by numeric id

use super::DrawDevice;
use crate::error::DrawError;
use crate::geometry::Point;
use crate::mapper::Scaling;

pub const SCALING_SETTINGS_INTERFACE_ID: u32 = 10;
pub const DRAW_DEVICE_ORIGIN_INTERFACE_ID: u32 = 11;

/// Integer up-scaling of logical coordinates
pub trait ScalingSettings {
    /// Factors below 1 are a `BadArgument` and leave the device unchanged
    fn set_scaling_factor(&mut self, origin: Point, factor_x: i32, factor_y: i32) -> Result<(), DrawError>;
    fn get_scaling_factor(&self) -> Scaling;
    fn is_scaling_off(&self) -> bool;
}

/// Oriented position of logical (0, 0)
pub trait DrawDeviceOrigin {
    fn set_origin(&mut self, origin: Point) -> Result<(), DrawError>;
    fn get_origin(&self) -> Point;
}

pub enum Interface<'d> {
    ScalingSettings(&'d mut dyn ScalingSettings),
    DrawDeviceOrigin(&'d mut dyn DrawDeviceOrigin),
}

impl<'a> DrawDevice<'a> {
    /// Extension interface `id`, or `NotSupported`
    pub fn get_interface(&mut self, id: u32) -> Result<Interface<'_>, DrawError> {
        match id {
            SCALING_SETTINGS_INTERFACE_ID => Ok(Interface::ScalingSettings(self)),
            DRAW_DEVICE_ORIGIN_INTERFACE_ID => Ok(Interface::DrawDeviceOrigin(self)),
            _ => {
                log::warn!("unknown interface id {}", id);
                Err(DrawError::NotSupported)
            },
        }
    }
}

impl ScalingSettings for DrawDevice<'_> {
    fn set_scaling_factor(&mut self, origin: Point, factor_x: i32, factor_y: i32) -> Result<(), DrawError> {
        let scaling = Scaling::new(origin, factor_x, factor_y)?;
        if scaling != self.scaling {
            log::debug!("scaling {}x{} at ({}, {})", factor_x, factor_y, origin.x, origin.y);
        }
        self.scaling = scaling;
        Ok(())
    }

    fn get_scaling_factor(&self) -> Scaling {
        self.scaling
    }

    fn is_scaling_off(&self) -> bool {
        self.scaling.is_off()
    }
}

impl DrawDeviceOrigin for DrawDevice<'_> {
    fn set_origin(&mut self, origin: Point) -> Result<(), DrawError> {
        log::debug!("origin ({}, {})", origin.x, origin.y);
        self.scaling.origin = origin;
        Ok(())
    }

    fn get_origin(&self) -> Point {
        self.scaling.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::draw_mode::DrawMode;
    use crate::format::DisplayMode;
    use crate::geometry::{Rect, Size};

    fn bitmap() -> DrawDevice<'static> {
        DrawDevice::new_bitmap(Size::new(8, 4), DisplayMode::Gray256).unwrap()
    }

    #[test]
    fn test_unknown_interface() {
        let mut dev = bitmap();
        assert!(matches!(dev.get_interface(99), Err(DrawError::NotSupported)));
    }

    #[test]
    fn test_scaling_through_interface() {
        let mut dev = bitmap();
        let Ok(Interface::ScalingSettings(s)) = dev.get_interface(SCALING_SETTINGS_INTERFACE_ID) else {
            panic!("scaling settings missing");
        };
        assert!(s.is_scaling_off());
        s.set_scaling_factor(Point::ORIGIN, 2, 2).unwrap();
        assert!(!s.is_scaling_off());
        assert!(s.set_scaling_factor(Point::ORIGIN, 0, 1).is_err());
        assert_eq!(s.get_scaling_factor().factor_x, 2);
        assert_eq!(dev.get_draw_rect(), Rect::from_xywh(0, 0, 4, 2));
    }

    #[test]
    fn test_origin_shifts_writes() {
        let mut dev = bitmap();
        if let Ok(Interface::DrawDeviceOrigin(o)) = dev.get_interface(DRAW_DEVICE_ORIGIN_INTERFACE_ID) {
            o.set_origin(Point::new(2, 1)).unwrap();
            assert_eq!(o.get_origin(), Point::new(2, 1));
        }
        assert_eq!(dev.get_draw_rect(), Rect::from_xywh(-2, -1, 8, 4));
        dev.write_rgb(0, 0, Rgb::WHITE, DrawMode::PEN);
        dev.set_origin(Point::ORIGIN).unwrap();
        assert_eq!(dev.read_pixel(2, 1), Rgb::WHITE);
    }
}
