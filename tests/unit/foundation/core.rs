use super::*;

#[test]
fn rgb565_packing_truncates_low_bits() {
    assert_eq!(pack_rgb565(0xFF, 0xFF, 0xFF), 0xFFFF);
    assert_eq!(pack_rgb565(0, 0, 0), 0);
    assert_eq!(pack_rgb565(0xF8, 0, 0), 0xF800);
    assert_eq!(pack_rgb565(0, 0xFC, 0), 0x07E0);
    assert_eq!(pack_rgb565(0, 0, 0xF8), 0x001F);
    assert_eq!(pack_rgb565(0x07, 0x03, 0x07), 0);
}

#[test]
fn rgb565_unpack_keeps_channel_levels() {
    for v in [0u8, 1, 7, 8, 100, 128, 200, 254, 255] {
        let [r, g, b] = unpack_rgb565(pack_rgb565(v, v, v));
        assert_eq!(r >> 3, v >> 3);
        assert_eq!(g >> 2, v >> 2);
        assert_eq!(b >> 3, v >> 3);
    }
    assert_eq!(unpack_rgb565(0xFFFF), [255, 255, 255]);
}

#[test]
fn formats_read_back_what_they_write() {
    let rgb = [0x12, 0x34, 0x56];
    for fmt in [PixelFormat::Rgb888, PixelFormat::Xrgb8888] {
        let mut px = [0u8; 4];
        fmt.write_rgb(&mut px, rgb);
        assert_eq!(fmt.read_rgb(&px), rgb);
    }
    let mut px = [0u8; 4];
    PixelFormat::Xrgb8888.write_rgb(&mut px, rgb);
    assert_eq!(u32::from_le_bytes(px), 0x0012_3456);
}

#[test]
fn bytes_per_pixel_per_format() {
    assert_eq!(PixelFormat::Rgb565.bytes_per_pixel(), 2);
    assert_eq!(PixelFormat::Rgb888.bytes_per_pixel(), 3);
    assert_eq!(PixelFormat::Xrgb8888.bytes_per_pixel(), 4);
}

#[test]
fn corner_rect_full_frame_and_emptiness() {
    let r = CornerRect::full(QVGA_WIDTH, QVGA_HEIGHT);
    assert_eq!(r.lrc, Corner::new(319, 239));
    assert!(r.contains(0, 0));
    assert!(r.contains(319, 239));
    assert!(!r.contains(320, 0));

    let empty = CornerRect::new(Corner::new(320, 0), Corner::new(319, 239));
    assert!(empty.is_empty());
    assert!(!empty.contains(319, 0));
}

#[test]
fn flip_parses_aliases() {
    assert_eq!(Flip::parse("none").unwrap(), Flip::NONE);
    assert!(Flip::parse("V").unwrap().vertical);
    assert!(Flip::parse("horizontal").unwrap().horizontal);
    let both = Flip::parse("hv").unwrap();
    assert!(both.horizontal && both.vertical);
    assert!(Flip::parse("diagonal").is_err());
}
