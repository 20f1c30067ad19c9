use std::path::Path;
use std::process::{Command, Output};

fn las2pcd(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_las2pcd"))
        .args(args)
        .env_remove("LAS2PCD_COLOR_SCALING")
        .env_remove("LAS2PCD_DATA")
        .output()
        .unwrap()
}

fn write_las(path: &Path, colors: &[(u16, u16, u16)]) {
    let mut builder = las::Builder::from((1, 2));
    builder.point_format = las::point::Format::new(2).unwrap();
    let header = builder.into_header().unwrap();
    let mut writer = las::Writer::from_path(path, header).unwrap();
    for (i, &(r, g, b)) in colors.iter().enumerate() {
        let point = las::Point {
            x: i as f64,
            y: 2.0 * i as f64,
            z: 0.5,
            color: Some(las::Color::new(r, g, b)),
            ..Default::default()
        };
        writer.write(point).unwrap();
    }
    writer.close().unwrap();
}

#[test]
fn converts_las_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.las");
    let output = dir.path().join("out.pcd");
    write_las(&input, &[(65535, 0, 32768), (0, 0, 0), (65280, 256, 1)]);

    let result = las2pcd(&[input.as_path(), output.as_path()]);
    assert_eq!(result.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("3 points detected"));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Saved 3 data points"));

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("FIELDS x y z rgb\n"));
    assert!(text.contains("WIDTH 3\nHEIGHT 1\n"));
    let body: Vec<&str> = text
        .lines()
        .skip_while(|l| !l.starts_with("DATA"))
        .skip(1)
        .collect();
    let rgb: Vec<u32> = body
        .iter()
        .map(|line| line.split(' ').nth(3).unwrap().parse().unwrap())
        .collect();
    assert_eq!(rgb, vec![0x0000_0080, 0, 0x00ff_0101]);
}

#[test]
fn binary_output_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.las");
    let output = dir.path().join("out.pcd");
    write_las(&input, &[(65535, 65535, 65535)]);

    let result = Command::new(env!("CARGO_BIN_EXE_las2pcd"))
        .arg(&input)
        .arg(&output)
        .env("LAS2PCD_COLOR_SCALING", "clamp")
        .env("LAS2PCD_DATA", "binary")
        .output()
        .unwrap();
    assert_eq!(result.status.code(), Some(0));

    let data = std::fs::read(&output).unwrap();
    let rgb = u32::from_le_bytes(data[data.len() - 4..].try_into().unwrap());
    assert_eq!(rgb, 0x00ff_ffff);
}

#[test]
fn invalid_option_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.las");
    let output = dir.path().join("out.pcd");
    write_las(&input, &[(1, 2, 3)]);

    let result = Command::new(env!("CARGO_BIN_EXE_las2pcd"))
        .arg(&input)
        .arg(&output)
        .env("LAS2PCD_DATA", "binary_compressed")
        .output()
        .unwrap();
    assert_eq!(result.status.code(), Some(1));
    assert!(!output.exists());
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.las");
    let output = dir.path().join("out.pcd");

    let result = las2pcd(&[input.as_path(), output.as_path()]);
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Impossible to open the file"));
    assert!(!output.exists());
}

#[test]
fn wrong_argument_count_fails() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.las");
    let b = dir.path().join("b.pcd");
    let c = dir.path().join("c.pcd");
    let (a, b, c) = (a.as_path(), b.as_path(), c.as_path());

    for args in [vec![], vec![a], vec![a, b, c]] {
        let result = las2pcd(&args);
        assert_eq!(result.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&result.stderr);
        assert!(stderr.contains("You must enter an input path and an output path"));
    }
    assert!(!b.exists());
    assert!(!c.exists());
}

#[test]
fn unwritable_output_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.las");
    let output = dir.path().join("missing-dir").join("out.pcd");
    write_las(&input, &[(1, 2, 3)]);

    let result = las2pcd(&[input.as_path(), output.as_path()]);
    assert_eq!(result.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("1 points detected"));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Impossible to create the file"));
    assert!(!stderr.contains("Saved"));
}
