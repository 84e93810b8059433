use super::*;

const W: u16 = QVGA_WIDTH;
const H: u16 = QVGA_HEIGHT;

fn desc(format: PixelFormat) -> SurfaceDesc {
    SurfaceDesc::new(W, H, format)
}

fn solid(format: PixelFormat, rgb: [u8; 3]) -> Vec<u8> {
    let d = desc(format);
    let mut buf = vec![0u8; d.byte_len()];
    for px in buf.chunks_exact_mut(format.bytes_per_pixel()) {
        format.write_rgb(px, rgb);
    }
    buf
}

fn read(buf: &[u8], format: PixelFormat, x: u16, y: u16) -> [u8; 3] {
    let off = desc(format).offset_of(x, y);
    format.read_rgb(&buf[off..])
}

fn run_pass(c: &mut SoftCompositor, ps: &[u8], alpha: &[u8], out: &mut [u8]) {
    c.start(PassIo { ps, alpha, out }).unwrap();
    while !c.poll_done() {}
    c.stop();
}

#[test]
fn blend_endpoints_select_one_source() {
    let a = [10, 20, 30];
    let b = [200, 210, 220];
    assert_eq!(blend(a, b, 0), a);
    assert_eq!(blend(a, b, 255), b);
    let mid = blend([0, 0, 0], [255, 255, 255], 128);
    assert_eq!(mid, [128, 128, 128]);
}

#[test]
fn full_frame_alpha_zero_copies_processing() {
    let ps = solid(PixelFormat::Rgb565, [255, 0, 0]);
    let alpha = solid(PixelFormat::Rgb565, [0, 0, 255]);
    let mut out = vec![0u8; desc(PixelFormat::Rgb565).byte_len()];

    let mut c = SoftCompositor::default();
    run_pass(&mut c, &ps, &alpha, &mut out);
    assert_eq!(out, ps);
    assert_eq!(c.passes(), 1);
}

#[test]
fn alpha_255_inside_as_rect_only() {
    let ps = solid(PixelFormat::Rgb565, [255, 0, 0]);
    let alpha = solid(PixelFormat::Rgb565, [0, 0, 255]);
    let mut out = vec![0u8; desc(PixelFormat::Rgb565).byte_len()];

    let mut c = SoftCompositor::default();
    c.set_alpha(255);
    c.set_as_rect(CornerRect::new(Corner::ORIGIN, Corner::new(7, H - 1)));
    run_pass(&mut c, &ps, &alpha, &mut out);
    assert_eq!(read(&out, PixelFormat::Rgb565, 0, 0), [0, 0, 255]);
    assert_eq!(read(&out, PixelFormat::Rgb565, 7, 100), [0, 0, 255]);
    assert_eq!(read(&out, PixelFormat::Rgb565, 8, 100), [255, 0, 0]);
}

#[test]
fn ps_outside_rect_is_black_background() {
    let ps = solid(PixelFormat::Rgb565, [255, 255, 255]);
    let alpha = solid(PixelFormat::Rgb565, [0, 0, 0]);
    let mut out = vec![0xFFu8; desc(PixelFormat::Rgb565).byte_len()];

    let mut c = SoftCompositor::default();
    c.set_ps_rect(CornerRect::new(Corner::new(10, 10), Corner::new(20, 20)));
    run_pass(&mut c, &ps, &alpha, &mut out);
    assert_eq!(read(&out, PixelFormat::Rgb565, 0, 0), [0, 0, 0]);
    assert_eq!(read(&out, PixelFormat::Rgb565, 15, 15), [255, 255, 255]);
}

#[test]
fn ps_origin_and_scale_select_sub_window() {
    let mut ps = solid(PixelFormat::Rgb565, [0, 0, 0]);
    let d = desc(PixelFormat::Rgb565);
    let off = d.offset_of(100, 50);
    PixelFormat::Rgb565.write_rgb(&mut ps[off..], [255, 255, 255]);
    let alpha = solid(PixelFormat::Rgb565, [0, 0, 0]);
    let mut out = vec![0u8; d.byte_len()];

    let mut c = SoftCompositor::default();
    c.set_ps_origin(Corner::new(100, 50));
    c.set_scale(2.0);
    run_pass(&mut c, &ps, &alpha, &mut out);
    // 2x zoom: source pixel (100,50) covers output (0..=1, 0..=1).
    assert_eq!(read(&out, PixelFormat::Rgb565, 0, 0), [255, 255, 255]);
    assert_eq!(read(&out, PixelFormat::Rgb565, 1, 1), [255, 255, 255]);
    assert_eq!(read(&out, PixelFormat::Rgb565, 2, 0), [0, 0, 0]);
}

#[test]
fn vertical_flip_mirrors_rows() {
    let mut ps = solid(PixelFormat::Rgb565, [0, 0, 0]);
    let d = desc(PixelFormat::Rgb565);
    let off = d.offset_of(5, 0);
    PixelFormat::Rgb565.write_rgb(&mut ps[off..], [255, 255, 255]);
    let alpha = solid(PixelFormat::Rgb565, [0, 0, 0]);
    let mut out = vec![0u8; d.byte_len()];

    let mut c = SoftCompositor::default();
    c.set_flip(Flip {
        horizontal: false,
        vertical: true,
    });
    run_pass(&mut c, &ps, &alpha, &mut out);
    assert_eq!(read(&out, PixelFormat::Rgb565, 5, H - 1), [255, 255, 255]);
    assert_eq!(read(&out, PixelFormat::Rgb565, 5, 0), [0, 0, 0]);
}

#[test]
fn output_format_conversion() {
    let ps = solid(PixelFormat::Rgb565, [0xF8, 0xFC, 0xF8]);
    let alpha = solid(PixelFormat::Rgb565, [0, 0, 0]);
    let mut out = vec![0u8; desc(PixelFormat::Xrgb8888).byte_len()];

    let mut c = SoftCompositor::default();
    c.set_output(desc(PixelFormat::Xrgb8888));
    run_pass(&mut c, &ps, &alpha, &mut out);
    assert_eq!(read(&out, PixelFormat::Xrgb8888, 319, 239), [0xFF, 0xFF, 0xFF]);
}

#[test]
fn busy_polls_delay_completion_and_double_start_is_rejected() {
    let ps = solid(PixelFormat::Rgb565, [0, 0, 0]);
    let alpha = ps.clone();
    let mut out = ps.clone();

    let mut c = SoftCompositor::new(SoftCompositorOpts {
        busy_polls: 2,
        record_history: true,
        never_completes: false,
    });
    c.start(PassIo {
        ps: &ps,
        alpha: &alpha,
        out: &mut out,
    })
    .unwrap();
    assert!(!c.poll_done());
    assert!(!c.poll_done());
    assert!(
        c.start(PassIo {
            ps: &ps,
            alpha: &alpha,
            out: &mut out,
        })
        .is_err()
    );
    assert!(c.poll_done());
    c.stop();
    assert!(!c.is_busy());
    assert_eq!(c.history().len(), 1);
}

#[test]
fn short_buffers_and_bad_scale_are_engine_errors() {
    let ps = vec![0u8; 16];
    let alpha = solid(PixelFormat::Rgb565, [0, 0, 0]);
    let mut out = alpha.clone();
    let mut c = SoftCompositor::default();
    let err = c
        .start(PassIo {
            ps: &ps,
            alpha: &alpha,
            out: &mut out,
        })
        .unwrap_err();
    assert!(err.to_string().contains("engine error:"));

    let ps = alpha.clone();
    c.set_scale(0.0);
    assert!(
        c.start(PassIo {
            ps: &ps,
            alpha: &alpha,
            out: &mut out,
        })
        .is_err()
    );
}
