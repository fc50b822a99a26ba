//! Algebraic properties of the compositor, blender and coordinate mapper

use bitdraw::blend::blend_rgb;
use bitdraw::codec::PixelCodec;
use bitdraw::mapper::Transform;
use bitdraw::{DisplayMode, DrawDevice, DrawMode, Orientation, Point, Rect, Rgb, Scaling, Size};
use proptest::prelude::*;

fn arb_rgb() -> impl Strategy<Value = Rgb> {
    any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Rgb::new(r, g, b))
}

fn arb_direct_mode() -> impl Strategy<Value = DisplayMode> {
    prop::sample::select(
        DisplayMode::ALL
            .iter()
            .copied()
            .filter(|m| !m.is_palettized())
            .collect::<Vec<_>>(),
    )
}

fn arb_orientation() -> impl Strategy<Value = Orientation> {
    prop::sample::select(Orientation::ALL.to_vec())
}

proptest! {
    #[test]
    fn xor_twice_is_identity(mode in arb_direct_mode(), base in arb_rgb(), pen in arb_rgb(), w in 1i32..12) {
        let mut dev = DrawDevice::new_bitmap(Size::new(w, 2), mode).unwrap();
        dev.write_rgb_multi(0, 0, w, 2, base, DrawMode::PEN);
        let before: Vec<Rgb> = (0..w).map(|x| dev.read_pixel(x, 1)).collect();
        dev.write_rgb_multi(0, 0, w, 2, pen, DrawMode::XOR);
        dev.write_rgb_multi(0, 0, w, 2, pen, DrawMode::XOR);
        let after: Vec<Rgb> = (0..w).map(|x| dev.read_pixel(x, 1)).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn replace_overwrites_anything(mode in arb_direct_mode(), base in arb_rgb(), pen in arb_rgb()) {
        let mut a = DrawDevice::new_bitmap(Size::new(2, 1), mode).unwrap();
        let mut b = DrawDevice::new_bitmap(Size::new(2, 1), mode).unwrap();
        a.write_rgb(0, 0, base, DrawMode::PEN);
        a.write_rgb(0, 0, pen, DrawMode::PEN);
        b.write_rgb(0, 0, pen, DrawMode::PEN);
        prop_assert_eq!(a.read_pixel(0, 0), b.read_pixel(0, 0));
    }

    #[test]
    fn blend_endpoints(src in arb_rgb(), dst in arb_rgb()) {
        prop_assert_eq!(blend_rgb(src, dst, 255), src.opaque());
        prop_assert_eq!(blend_rgb(src, dst, 0), dst);
    }

    #[test]
    fn quantize_is_stable(mode in arb_direct_mode(), c in arb_rgb()) {
        let codec = PixelCodec::new(mode, None).unwrap();
        let once = codec.quantize(c);
        prop_assert_eq!(codec.quantize(once), once);
    }

    #[test]
    fn orientation_mapping_inverts(
        orientation in arb_orientation(),
        w in 1i32..20,
        h in 1i32..20,
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
    ) {
        let t = Transform::new(Size::new(w, h), orientation, Scaling::default());
        let size = t.oriented_size();
        let p = Point::new((fx * size.width as f64) as i32, (fy * size.height as f64) as i32);
        let q = t.to_physical(p);
        prop_assert!(q.x >= 0 && q.y >= 0 && q.x < w && q.y < h);
        prop_assert_eq!(t.to_oriented(q), p);
    }

    #[test]
    fn four_turns_are_a_cycle(start in arb_orientation()) {
        let mut o = start;
        for _ in 0..4 {
            o = o.rotated_cw();
        }
        prop_assert_eq!(o, start);
    }

    #[test]
    fn remap_reverses(colors in prop::collection::vec(0usize..3, 6)) {
        let palette = [Rgb::RED, Rgb::GREEN, Rgb::BLUE];
        let mut dev = DrawDevice::new_bitmap(Size::new(6, 1), DisplayMode::Color16M).unwrap();
        for (x, &i) in colors.iter().enumerate() {
            dev.write_rgb(x as i32, 0, palette[i], DrawMode::PEN);
        }
        let before: Vec<Rgb> = (0..6).map(|x| dev.read_pixel(x, 0)).collect();
        let pairs = [(Rgb::RED, Rgb::new(9, 9, 9)), (Rgb::GREEN, Rgb::new(7, 7, 7))];
        let rect = Rect::from_xywh(0, 0, 6, 1);
        dev.map_colors(rect, &pairs, true);
        dev.map_colors(rect, &pairs, false);
        let after: Vec<Rgb> = (0..6).map(|x| dev.read_pixel(x, 0)).collect();
        prop_assert_eq!(before, after);
    }
}
