use bitdraw::screen::sdl::{self, InputEvent, SdlScreen};
use bitdraw::{DeviceConfig, DisplayMode, DrawDevice, DrawMode, Rect, Rgb, ShadowMode};
use sdl2::keyboard::Keycode;

const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const CONFIG_PATH: &str = "bitdraw.json";

/// Parse command line arguments and return (width, height, vsync, mode)
fn parse_args() -> (u32, u32, bool, DisplayMode) {
    let args: Vec<String> = std::env::args().collect();
    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;
    let mut vsync = true;
    let mut mode = DisplayMode::Color16MU;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => vsync = false,
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // Parse WxH format (e.g., 800x600)
                    let parts: Vec<&str> = args[i + 1].split('x').collect();
                    if parts.len() == 2 {
                        if let (Ok(w), Ok(h)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                            width = w;
                            height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--mode" | "-m" => {
                if i + 1 < args.len() {
                    match args[i + 1].as_str() {
                        "gray256" => mode = DisplayMode::Gray256,
                        "4k" => mode = DisplayMode::Color4K,
                        "64k" => mode = DisplayMode::Color64K,
                        "16m" => mode = DisplayMode::Color16M,
                        "16mu" => mode = DisplayMode::Color16MU,
                        other => eprintln!("Unknown mode '{}', keeping {:?}", other, mode),
                    }
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: bitdraw-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --resolution WxH, -r WxH  Window size (default: {}x{})", DEFAULT_WIDTH, DEFAULT_HEIGHT);
                println!("  --mode M, -m M            Device mode: gray256, 4k, 64k, 16m, 16mu");
                println!("  --no-vsync                Disable VSync");
                println!("  --help                    Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    (width, height, vsync, mode)
}

/// Draw the test pattern in logical coordinates of the current orientation
fn draw_pattern(dev: &mut DrawDevice<'_>) {
    let area = dev.get_draw_rect();
    let (w, h) = (area.width(), area.height());
    dev.write_rgb_multi(area.tl.x, area.tl.y, w, h, Rgb::new(0x20, 0x20, 0x30), DrawMode::PEN);

    // Color bars across the top half
    let bars = [Rgb::RED, Rgb::GREEN, Rgb::BLUE, Rgb::WHITE, Rgb::new(0xff, 0xff, 0)];
    let bar_w = w / bars.len() as i32;
    for (i, &color) in bars.iter().enumerate() {
        if bar_w > 0 {
            dev.write_rgb_multi(area.tl.x + i as i32 * bar_w, area.tl.y, bar_w, h / 2, color, DrawMode::PEN);
        }
    }

    // Alpha ramps from transparent to opaque white
    let ramp: Vec<u8> = (0..w).map(|x| (x * 255 / w.max(1)) as u8).collect();
    for y in h / 2..h / 2 + h / 8 {
        dev.write_rgb_alpha_multi(area.tl.x, area.tl.y + y, w, Rgb::WHITE, &ramp);
    }

    // Checkerboard from bit masks, xor'd over the bottom
    let rows = [0x5555_5555u32, 0xaaaa_aaaa];
    let mut y = area.tl.y + h * 3 / 4;
    while y + 2 <= area.br.y {
        let mut x = area.tl.x;
        while x + 32 <= area.br.x {
            dev.write_binary(x, y, &rows, 32, Rgb::WHITE, DrawMode::XOR);
            x += 32;
        }
        y += 2;
    }
}

fn main() -> Result<(), String> {
    env_logger::init();
    let (width, height, vsync, mode) = parse_args();

    let (canvas, texture_creator, mut events) = sdl::open("bitdraw", width, height, vsync).map_err(|e| e.to_string())?;
    let screen = SdlScreen::new(canvas, &texture_creator).map_err(|e| e.to_string())?;
    let mut dev = DrawDevice::new_screen(Box::new(screen), mode).map_err(|e| e.to_string())?;

    if let Ok(cfg) = DeviceConfig::load(CONFIG_PATH) {
        if let Err(e) = dev.apply_config(&cfg) {
            eprintln!("Ignoring {}: {}", CONFIG_PATH, e);
        }
    }
    dev.init_screen().map_err(|e| e.to_string())?;

    println!("=== bitdraw ===");
    println!("Resolution: {}x{} {:?}", width, height, mode);
    println!("Controls:");
    println!("  R          - Rotate clockwise");
    println!("  S          - Toggle shadow");
    println!("  F          - Toggle fade");
    println!("  W          - Save settings to {}", CONFIG_PATH);
    println!("  Escape     - Quit");

    let mut dirty = true;
    'main: loop {
        for event in events.poll() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::R) => {
                    let next = dev.orientation().rotated_cw();
                    if !dev.set_orientation(next) {
                        eprintln!("Orientation {:?} not available", next);
                    }
                    dirty = true;
                },
                InputEvent::KeyDown(Keycode::S) => {
                    dev.set_shadow_mode(dev.shadow_mode() ^ ShadowMode::SHADOW);
                    dirty = true;
                },
                InputEvent::KeyDown(Keycode::F) => {
                    dev.set_shadow_mode(dev.shadow_mode() ^ ShadowMode::FADE);
                    dirty = true;
                },
                InputEvent::KeyDown(Keycode::W) => match dev.config().save(CONFIG_PATH) {
                    Ok(()) => println!("Settings saved to {}", CONFIG_PATH),
                    Err(e) => eprintln!("Failed to save: {}", e),
                },
                InputEvent::KeyDown(_) => {},
            }
        }

        if dirty {
            draw_pattern(&mut dev);
            dev.update_region(Rect::from_size(dev.size_in_pixels()))
                .map_err(|e| e.to_string())?;
            dirty = false;
        }
        std::thread::sleep(std::time::Duration::from_millis(16));
    }

    Ok(())
}
