use simple_icons::{decode, inspect, ColorType, PngEncoder, Pixel};

#[test]
fn brand_icon_decodes_to_solid_rgb() {
    let png = PngEncoder::default().solid(48, 48, Pixel::BRAND).unwrap();
    let decoded = decode(&png).unwrap();
    assert_eq!((decoded.header.width, decoded.header.height), (48, 48));
    assert_eq!(decoded.header.color_type, ColorType::Truecolor);
    assert_eq!(decoded.header.bit_depth, 8);
    assert!(decoded.pixels.chunks(3).all(|p| p == [99, 102, 241]));
    assert_eq!(decoded.pixels.len(), 48 * 48 * 3);
}

#[test]
fn standard_decoder_accepts_output() {
    for (width, height) in [(1, 1), (48, 48), (7, 300), (300, 7), (1024, 1)] {
        let color = Pixel::rgb(12, 200, 7);
        let png = PngEncoder::default().solid(width, height, color).unwrap();
        let img = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
            .unwrap()
            .to_rgb8();
        assert_eq!(img.dimensions(), (width, height));
        assert!(img.pixels().all(|p| p.0 == [12, 200, 7]), "{width}x{height}");
    }
}

#[test]
fn rgba_output_round_trips_through_image() {
    let mut pixels = Vec::new();
    for y in 0..5u8 {
        for x in 0..3u8 {
            pixels.extend([x * 40, y * 40, 255 - x, 128 + y]);
        }
    }
    let png = PngEncoder::default()
        .encode(3, 5, ColorType::TruecolorWithAlpha, &pixels)
        .unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.as_raw(), &pixels);
    assert_eq!(decode(&png).unwrap().pixels, pixels);
}

#[test]
fn every_chunk_crc_is_valid() {
    let png = PngEncoder::with_level(9).solid(29, 29, Pixel::BRAND).unwrap();
    let chunks = inspect(&png).unwrap();
    let types: Vec<_> = chunks.iter().map(|c| c.chunk_type.as_str()).collect();
    assert_eq!(types, ["IHDR", "IDAT", "IEND"]);
    assert_eq!(chunks[0].length, 13);
    assert_eq!(chunks[2].length, 0);

    // flip one byte in every chunk's CRC in turn
    let mut offset = 8;
    for chunk in &chunks {
        let crc_at = offset + 8 + chunk.length;
        let mut corrupt = png.clone();
        corrupt[crc_at] ^= 0x01;
        assert!(inspect(&corrupt).is_err(), "{} CRC not checked", chunk.chunk_type);
        offset = crc_at + 4;
    }
    assert_eq!(offset, png.len());
}

#[test]
fn encoding_is_deterministic() {
    let encoder = PngEncoder::default();
    assert_eq!(
        encoder.solid(192, 192, Pixel::BRAND).unwrap(),
        encoder.solid(192, 192, Pixel::BRAND).unwrap()
    );
}
