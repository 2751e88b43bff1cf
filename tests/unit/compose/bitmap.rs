use super::*;

fn png_bytes(img: &image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn def(format: BitmapFormat, data: Vec<u8>, alpha: Option<Vec<u8>>) -> BitmapDef {
    BitmapDef {
        id: 4,
        width: 2,
        height: 1,
        format,
        data,
        alpha,
    }
}

#[test]
fn raw_rgba_must_fill_the_frame() {
    let ok = decode_bitmap(&def(BitmapFormat::Rgba, vec![1, 2, 3, 4, 5, 6, 7, 8], None)).unwrap();
    assert_eq!(ok.get_pixel(1, 0).0, [5, 6, 7, 8]);

    let err = decode_bitmap(&def(BitmapFormat::Rgba, vec![1, 2, 3], None)).unwrap_err();
    assert!(matches!(err, ExportError::Image(_)));
}

#[test]
fn encoded_bitmap_takes_separate_alpha_plane() {
    let src = image::RgbaImage::from_raw(2, 1, vec![10, 20, 30, 255, 40, 50, 60, 255]).unwrap();
    let decoded = decode_bitmap(&def(BitmapFormat::Png, png_bytes(&src), Some(vec![0, 128])))
        .unwrap();
    assert_eq!(decoded.get_pixel(0, 0).0, [10, 20, 30, 0]);
    assert_eq!(decoded.get_pixel(1, 0).0, [40, 50, 60, 128]);

    let ignored = decode_bitmap(&def(BitmapFormat::Png, png_bytes(&src), Some(vec![0])))
        .unwrap();
    assert_eq!(ignored.get_pixel(0, 0).0[3], 255);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_bitmap(&def(BitmapFormat::Jpeg, vec![0, 1, 2], None)).is_err());
}

#[test]
fn data_url_is_base64_png() {
    let img = image::RgbaImage::from_raw(1, 1, vec![0, 0, 0, 255]).unwrap();
    let url = png_data_url(&img).unwrap();
    let payload = url.strip_prefix("data:image/png;base64,").unwrap();
    let bytes = STANDARD.decode(payload).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}
