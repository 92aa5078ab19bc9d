use std::{collections::BTreeMap, fs, path::Path};

use image::{Rgba, RgbaImage};
use simple_icons::{decode, Fill, Generator, IconMatrix, IconTarget, Logo, Pixel, Platform};

fn read_rgba(path: &Path) -> RgbaImage {
    image::open(path).unwrap().to_rgba8()
}

#[test]
fn standard_matrix_writes_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let matrix = IconMatrix::standard(Fill::default());
    let report = Generator::new(dir.path()).run(&matrix);
    assert_eq!(report.total(), 32);
    assert_eq!(report.succeeded(), 32);

    let favicon = fs::read(dir.path().join("web/favicon.png")).unwrap();
    let decoded = decode(&favicon).unwrap();
    assert_eq!((decoded.header.width, decoded.header.height), (32, 32));
    assert!(decoded.pixels.chunks(3).all(|p| p == [99, 102, 241]));

    let mdpi = dir.path().join("android/app/src/main/res/mipmap-mdpi/ic_launcher.png");
    assert_eq!(read_rgba(&mdpi).dimensions(), (48, 48));
}

#[test]
fn one_unwritable_target_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    // a regular file where a directory is needed
    fs::write(dir.path().join("blocked"), b"not a directory").unwrap();
    let targets = vec![
        IconTarget::new("ok/one.png", 16),
        IconTarget::new("blocked/two.png", 16),
        IconTarget::new("ok/three.png", 16),
    ];
    let matrix = IconMatrix {
        fill: Fill::default(),
        platforms: BTreeMap::from([(Platform::Linux, targets)]),
    };
    let mut seen = Vec::new();
    let report = Generator::new(dir.path()).run_with(&matrix, |o| seen.push(o.path.clone()));

    assert_eq!(seen.len(), 3);
    assert_eq!(report.total(), 3);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.succeeded(), report.total() - 1);
    let failed: Vec<_> = report.failures().map(|o| o.path.clone()).collect();
    assert_eq!(failed, [Path::new("blocked/two.png")]);
    assert!(dir.path().join("ok/one.png").is_file());
    assert!(dir.path().join("ok/three.png").is_file());
}

#[test]
fn generating_twice_is_byte_identical() {
    let logo = RgbaImage::from_fn(90, 60, |x, y| Rgba([(x * 2) as u8, (y * 4) as u8, 77, 255]));
    let mut matrix = IconMatrix::standard(Fill::Logo {
        background: Some(Pixel::BRAND),
    });
    matrix.retain_platforms(&[Platform::Ios]);

    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    for dir in [&first, &second] {
        let report = Generator::new(dir.path())
            .with_logo(Logo::from_image(logo.clone()))
            .run(&matrix);
        assert_eq!(report.failed(), 0);
    }
    for target in matrix.targets() {
        let a = fs::read(first.path().join(&target.target.path)).unwrap();
        let b = fs::read(second.path().join(&target.target.path)).unwrap();
        assert_eq!(a, b, "{}", target.target.path.display());
    }
}

#[test]
fn logo_icons_are_padded_and_centered() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("logo.png");
    RgbaImage::from_pixel(200, 100, Rgba([255, 255, 255, 255]))
        .save(&source)
        .unwrap();

    let mut matrix = IconMatrix::standard(Fill::Logo { background: None });
    matrix.retain_platforms(&[Platform::Android]);
    let report = Generator::new(dir.path().join("out"))
        .with_logo(Logo::open(&source).unwrap())
        .run(&matrix);
    assert_eq!(report.succeeded(), 5);

    // xxxhdpi: 192 with 24 px padding, logo 144x72
    let icon = read_rgba(&dir.path().join("out/android/app/src/main/res/mipmap-xxxhdpi/ic_launcher.png"));
    assert_eq!(icon.dimensions(), (192, 192));
    let opaque: Vec<(u32, u32)> = icon
        .enumerate_pixels()
        .filter(|(_, _, p)| p[3] > 0)
        .map(|(x, y, _)| (x, y))
        .collect();
    let min_x = opaque.iter().map(|p| p.0).min().unwrap();
    let max_x = opaque.iter().map(|p| p.0).max().unwrap();
    let min_y = opaque.iter().map(|p| p.1).min().unwrap();
    let max_y = opaque.iter().map(|p| p.1).max().unwrap();
    assert_eq!((min_x, max_x), (24, 167));
    assert_eq!((min_y, max_y), (60, 131));
    assert!((191 - max_x).abs_diff(min_x) <= 1);
    assert!((191 - max_y).abs_diff(min_y) <= 1);
}

#[test]
fn missing_source_logo_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Logo::open(dir.path().join("assets/AppLogo.jpg")).is_err());
}

#[test]
fn ico_holds_a_png_per_size() {
    let dir = tempfile::tempdir().unwrap();
    let mut matrix = IconMatrix::standard(Fill::Badge {
        color: Pixel::BRAND,
        border: Pixel::WHITE,
        text: "R".to_owned(),
    });
    matrix.retain_platforms(&[Platform::Windows]);
    let report = Generator::new(dir.path()).run(&matrix);
    assert_eq!(report.succeeded(), 2);

    let ico = fs::read(dir.path().join("windows/runner/app_icon.ico")).unwrap();
    assert_eq!(&ico[..6], &[0, 0, 1, 0, 6, 0]);
    for (i, size) in [16u32, 32, 48, 64, 128, 256].into_iter().enumerate() {
        let entry = &ico[6 + 16 * i..22 + 16 * i];
        assert_eq!(u32::from(entry[0]), size % 256);
        let len = u32::from_le_bytes(entry[8..12].try_into().unwrap()) as usize;
        let offset = u32::from_le_bytes(entry[12..16].try_into().unwrap()) as usize;
        let png = decode(&ico[offset..offset + len]).unwrap();
        assert_eq!((png.header.width, png.header.height), (size, size));
    }
}

#[test]
fn manifest_drives_generation() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("icons.json");
    fs::write(
        &manifest,
        r##"{
            "fill": { "kind": "solid", "color": "#102030" },
            "platforms": { "web": [ { "path": "site/fav.png", "size": 24 } ] }
        }"##,
    )
    .unwrap();
    let matrix = IconMatrix::load(&manifest).unwrap();
    let report = Generator::new(dir.path()).run(&matrix);
    assert_eq!(report.succeeded(), 1);
    let decoded = decode(&fs::read(dir.path().join("site/fav.png")).unwrap()).unwrap();
    assert_eq!(decoded.pixel(23, 23), Some(&[0x10, 0x20, 0x30][..]));
}
