use super::{Frame, ScreenInfo, ScreenSink};
use crate::error::DrawError;
use crate::format::DisplayMode;
use crate::geometry::{Rect, Size};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

fn screen_err(e: impl ToString) -> DrawError {
    DrawError::Screen(e.to_string())
}

/// Modes an SDL window accepts from a device
pub const SDL_MODES: [DisplayMode; 5] = [
    DisplayMode::Gray256,
    DisplayMode::Color4K,
    DisplayMode::Color64K,
    DisplayMode::Color16M,
    DisplayMode::Color16MU,
];

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
}

/// Keyboard and window events of an SDL window
pub struct SdlEvents {
    event_pump: EventPump,
}

impl SdlEvents {
    pub fn poll(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => events.push(InputEvent::KeyDown(key)),
                _ => {},
            }
        }
        events
    }
}

/// Open a window; the texture creator must outlive the [`SdlScreen`] built from it
pub fn open(
    title: &str,
    width: u32,
    height: u32,
    vsync: bool,
) -> Result<(Canvas<Window>, TextureCreator<WindowContext>, SdlEvents), DrawError> {
    let sdl_context = sdl2::init().map_err(screen_err)?;
    let video_subsystem = sdl_context.video().map_err(screen_err)?;

    let window = video_subsystem
        .window(title, width, height)
        .position_centered()
        .build()
        .map_err(screen_err)?;

    let mut canvas_builder = window.into_canvas().accelerated();
    if vsync {
        canvas_builder = canvas_builder.present_vsync();
    }
    let canvas = canvas_builder.build().map_err(screen_err)?;

    let texture_creator = canvas.texture_creator();
    let event_pump = sdl_context.event_pump().map_err(screen_err)?;
    log::debug!("opened {}x{} window '{}'", width, height, title);

    Ok((canvas, texture_creator, SdlEvents { event_pump }))
}

/// Presents device frames through a streaming RGBA8888 texture
pub struct SdlScreen<'t> {
    canvas: Canvas<Window>,
    texture: Texture<'t>,
    staging: Vec<u8>,
    size: Size,
}

impl<'t> SdlScreen<'t> {
    pub fn new(canvas: Canvas<Window>, creator: &'t TextureCreator<WindowContext>) -> Result<Self, DrawError> {
        let (width, height) = canvas.output_size().map_err(screen_err)?;
        let texture = creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(screen_err)?;
        Ok(Self {
            canvas,
            texture,
            staging: vec![0; (width * height * 4) as usize],
            size: Size::new(width as i32, height as i32),
        })
    }
}

impl ScreenSink for SdlScreen<'_> {
    fn info(&self) -> ScreenInfo {
        ScreenInfo::new(self.size, SDL_MODES.to_vec())
    }

    fn present(&mut self, frame: &Frame<'_>, area: Rect) -> Result<(), DrawError> {
        let area = area
            .intersection(&Rect::from_size(self.size))
            .intersection(&Rect::from_size(frame.size));
        let codec = frame.codec()?;
        let pitch = (self.size.width * 4) as usize;
        for y in area.tl.y..area.br.y {
            let row = frame.row(y);
            let line = &mut self.staging[y as usize * pitch..(y as usize + 1) * pitch];
            for x in area.tl.x..area.br.x {
                let c = codec.read(row, x as usize);
                // RGBA8888 is little-endian: A, B, G, R in memory
                let i = x as usize * 4;
                line[i] = 255;
                line[i + 1] = c.blue();
                line[i + 2] = c.green();
                line[i + 3] = c.red();
            }
        }

        self.texture
            .update(None, &self.staging, pitch)
            .map_err(screen_err)?;
        self.canvas.copy(&self.texture, None, None).map_err(screen_err)?;
        self.canvas.present();
        Ok(())
    }
}
