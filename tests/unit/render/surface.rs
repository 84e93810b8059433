use super::*;

fn qvga(format: PixelFormat) -> Vec<u8> {
    vec![0u8; SurfaceDesc::new(QVGA_WIDTH, QVGA_HEIGHT, format).byte_len()]
}

#[test]
fn byte_len_follows_geometry_and_format() {
    assert_eq!(
        SurfaceDesc::new(320, 240, PixelFormat::Rgb565).byte_len(),
        153_600
    );
    assert_eq!(
        SurfaceDesc::new(320, 240, PixelFormat::Rgb888).byte_len(),
        230_400
    );
    assert_eq!(SurfaceDesc::new(320, 240, PixelFormat::Rgb565).pitch(), 640);
    assert_eq!(
        SurfaceDesc::new(320, 240, PixelFormat::Rgb565).offset_of(2, 1),
        644
    );
}

#[test]
fn surface_rejects_short_buffers_and_zero_dims() {
    let mut small = vec![0u8; 10];
    assert!(Surface::new(&mut small, 320, 240, PixelFormat::Rgb565).is_err());
    let mut buf = vec![0u8; 16];
    assert!(Surface::new(&mut buf, 0, 1, PixelFormat::Rgb565).is_err());
}

#[test]
fn software_writes_mark_dirty() {
    let mut buf = qvga(PixelFormat::Rgb565);
    let mut s = Surface::new(&mut buf, 320, 240, PixelFormat::Rgb565).unwrap();
    assert!(s.take_dirty());
    assert!(!s.is_dirty());
    s.set_pixel_rgb(3, 4, [255, 255, 255]);
    assert!(s.is_dirty());
    assert_eq!(s.pixel_rgb(3, 4), [255, 255, 255]);
    assert_eq!(s.pixel_rgb(4, 4), [0, 0, 0]);
}

#[test]
fn surface_set_requires_qvga_and_matching_source_formats() {
    let mut a = qvga(PixelFormat::Rgb565);
    let mut b = qvga(PixelFormat::Rgb888);
    let mut c = qvga(PixelFormat::Rgb565);
    let err = SurfaceSet::new(
        Surface::new(&mut a, 320, 240, PixelFormat::Rgb565).unwrap(),
        Surface::new(&mut b, 320, 240, PixelFormat::Rgb888).unwrap(),
        Surface::new(&mut c, 320, 240, PixelFormat::Rgb565).unwrap(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("share a pixel format"));

    let mut a = qvga(PixelFormat::Rgb565);
    let mut b = qvga(PixelFormat::Rgb565);
    let mut c = vec![0u8; 160 * 120 * 2];
    assert!(
        SurfaceSet::new(
            Surface::new(&mut a, 320, 240, PixelFormat::Rgb565).unwrap(),
            Surface::new(&mut b, 320, 240, PixelFormat::Rgb565).unwrap(),
            Surface::new(&mut c, 160, 120, PixelFormat::Rgb565).unwrap(),
        )
        .is_err()
    );
}

#[test]
fn copy_alpha_to_processing_is_bytewise() {
    let mut a = qvga(PixelFormat::Rgb565);
    let mut b = qvga(PixelFormat::Rgb565);
    let mut c = qvga(PixelFormat::Xrgb8888);
    let mut set = SurfaceSet::new(
        Surface::new(&mut a, 320, 240, PixelFormat::Rgb565).unwrap(),
        Surface::new(&mut b, 320, 240, PixelFormat::Rgb565).unwrap(),
        Surface::new(&mut c, 320, 240, PixelFormat::Xrgb8888).unwrap(),
    )
    .unwrap();
    set.get_mut(SurfaceRole::Alpha).fill(0xAB);
    set.get_mut(SurfaceRole::Processing).take_dirty();
    set.copy_alpha_to_processing();
    assert!(set.processing().pixels().iter().all(|&b| b == 0xAB));
    assert!(set.processing().is_dirty());
}
