use std::{fs, path::Path, process::Command};

use simple_icons::{PngEncoder, Pixel};

fn gen_icons(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_gen-icons"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn missing_logo_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let out = gen_icons(
        dir.path(),
        &["generate", "--fill", "logo", "--source", "missing.jpg"],
    );
    assert!(!out.status.success());
    assert!(!dir.path().join("web").exists());
}

#[test]
fn solid_run_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let out = gen_icons(dir.path(), &["generate", "--platform", "web"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Icons created: 5/5"), "{stdout}");
}

#[test]
fn inspect_rejects_crc_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let mut png = PngEncoder::default().solid(4, 4, Pixel::BRAND).unwrap();
    fs::write(dir.path().join("good.png"), &png).unwrap();
    // last byte of the IHDR CRC
    png[32] ^= 0xFF;
    fs::write(dir.path().join("bad.png"), &png).unwrap();

    let good = gen_icons(dir.path(), &["inspect", "good.png"]);
    assert!(good.status.success());
    assert!(String::from_utf8_lossy(&good.stdout).starts_with("IHDR 13\n"));
    assert!(!gen_icons(dir.path(), &["inspect", "bad.png"]).status.success());
}
