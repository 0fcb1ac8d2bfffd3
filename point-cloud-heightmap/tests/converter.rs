mod common;

use common::synthetic_cloud::bumpy_surface;
use point_cloud_heightmap::{
    ConvertError, HeightmapConverter, LoadError, PipelineError, PipelineParameters,
};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "point-cloud-heightmap-{}-{}",
        name,
        std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_cloud(path: &PathBuf, body: &str) {
    let mut file = fs::File::create(path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
}

#[test]
fn converts_point_file_to_png_and_manifest() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = scratch_dir("convert");
    let input = dir.join("scan.xyz");

    let mut body = String::from("# synthetic scan\n\n");
    for p in bumpy_surface(600, 8.0, 5.0, 42) {
        body.push_str(&format!("{} {} {}\n", p.x, p.y, p.z));
    }
    write_cloud(&input, &body);

    let converter = HeightmapConverter::new(&input, None)
        .with_manifest(true)
        .with_progress(false);
    assert_eq!(converter.output_path(), dir.join("scan_heightmap.png"));

    let params = PipelineParameters {
        fill_radius: 2,
        ..PipelineParameters::default()
    };
    let output = converter.convert(params).unwrap();

    let png = image::open(converter.output_path()).unwrap().to_luma8();
    assert_eq!(png.width() as usize, output.grid.cols);
    assert_eq!(png.height() as usize, output.grid.rows);
    assert_eq!(png.as_raw(), output.image.as_slice());

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("scan_heightmap.json")).unwrap())
            .unwrap();
    assert_eq!(manifest["point_count"], 600);
    assert_eq!(manifest["grid"]["rows"], output.grid.rows);
    assert_eq!(manifest["parameters"]["fill_method"], "telea");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_line_reports_its_number() {
    let dir = scratch_dir("malformed");
    let input = dir.join("bad.xyz");
    write_cloud(&input, "0 0 0\n1 0 0\n\n1 1 oops\n");

    let converter = HeightmapConverter::new(&input, Some(&dir.join("bad.png"))).with_progress(false);
    match converter.convert(PipelineParameters::default()) {
        Err(ConvertError::Load(LoadError::Parse { line, .. })) => assert_eq!(line, 4),
        other => panic!("expected parse error, got {other:?}"),
    }
    assert!(!dir.join("bad.png").exists());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn comment_only_file_has_no_points() {
    let dir = scratch_dir("empty");
    let input = dir.join("empty.xyz");
    write_cloud(&input, "# nothing here\n\n");

    let converter = HeightmapConverter::new(&input, None).with_progress(false);
    assert!(matches!(
        converter.convert(PipelineParameters::default()),
        Err(ConvertError::Pipeline(PipelineError::InvalidInput(_)))
    ));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_input_is_an_open_error() {
    let converter = HeightmapConverter::new(
        &std::env::temp_dir().join("point-cloud-heightmap-does-not-exist.xyz"),
        None,
    )
    .with_progress(false);
    assert!(matches!(
        converter.load(),
        Err(LoadError::Open { .. })
    ));
}
