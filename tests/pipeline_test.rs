// extract_images end-to-end tests with a simulated sandbox

mod common;

use std::fs;

use common::{FakeRunner, IMAGE_WITH_MASK_LIST, touch_pdf};
use pietro::error::PietroError;
use pietro::extract_images;
use pietro::pipeline::compositor::{CompositionOptions, IllustrationSource};
use pietro::pipeline::job_runner::JobConfig;
use pietro::pipeline::orchestrator::run_all_jobs;
use pietro::pipeline::raw_extraction::RawExtraction;
use tempfile::tempdir;

#[test]
fn test_image_with_mask_is_composited() {
    let input_dir = tempdir().expect("create temp dir");
    let output_dir = tempdir().expect("create temp dir");
    let pdf = touch_pdf(input_dir.path(), "doc.pdf");
    let runner = FakeRunner::new()
        .with_image_list(IMAGE_WITH_MASK_LIST)
        .with_dumped_files(&["000.png", "001.png"]);

    let report = extract_images(
        &runner,
        &pdf,
        output_dir.path(),
        &CompositionOptions::default(),
    )
    .expect("extract images");

    assert_eq!(report.document, "doc");
    assert_eq!(report.manifest_entries, 2);
    assert_eq!(report.illustrations.len(), 1);
    assert_eq!(
        report.illustrations[0].source,
        IllustrationSource::Composited
    );

    let illustrations_dir = output_dir.path().join("illustrations/doc");
    let files: Vec<String> = fs::read_dir(&illustrations_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files, vec!["0.png".to_string()]);
    assert_eq!(
        fs::read(illustrations_dir.join("0.png")).unwrap(),
        b"trimmed png",
        "output must come from compose+trim, not a copy"
    );

    assert_eq!(
        runner.command_lines(),
        vec![
            "pdfimages -list /app/input/doc.pdf".to_string(),
            "pdfimages -png /app/input/doc.pdf /app/output/PREFIX_TO_REMOVE".to_string(),
            "magick composite -compose CopyOpacity -resize 2625x1688 \
             /app/input/001.png /app/input/000.png PNG32:/app/output/0.tmp.png"
                .to_string(),
            "magick /app/input/0.tmp.png -trim PNG32:/app/input/0.tmp.png".to_string(),
        ]
    );
}

#[test]
fn test_rerun_on_unchanged_document_invokes_nothing() {
    let input_dir = tempdir().expect("create temp dir");
    let output_dir = tempdir().expect("create temp dir");
    let pdf = touch_pdf(input_dir.path(), "doc.pdf");
    let runner = FakeRunner::new()
        .with_image_list(IMAGE_WITH_MASK_LIST)
        .with_dumped_files(&["000.png", "001.png"]);
    let options = CompositionOptions::default();

    extract_images(&runner, &pdf, output_dir.path(), &options).expect("first run");
    let calls_after_first = runner.calls().len();
    let second = extract_images(&runner, &pdf, output_dir.path(), &options).expect("second run");

    assert_eq!(second.raw, RawExtraction::UpToDate);
    assert_eq!(second.illustrations[0].source, IllustrationSource::Existing);
    assert_eq!(runner.calls().len(), calls_after_first);
    assert_eq!(runner.count_starting_with("pdfimages -png"), 1);
}

#[test]
fn test_missing_input_has_no_side_effects() {
    let output_dir = tempdir().expect("create temp dir");
    let runner = FakeRunner::new();
    let missing = output_dir.path().join("absent.pdf");

    let err = extract_images(
        &runner,
        &missing,
        output_dir.path(),
        &CompositionOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, PietroError::MissingInputFile(ref p) if *p == missing));
    assert!(err.to_string().contains("absent.pdf"));
    assert!(runner.calls().is_empty());
    assert!(!output_dir.path().join("raw").exists());
}

#[test]
fn test_dump_failure_propagates() {
    let input_dir = tempdir().expect("create temp dir");
    let output_dir = tempdir().expect("create temp dir");
    let pdf = touch_pdf(input_dir.path(), "doc.pdf");
    let runner = FakeRunner::new()
        .with_image_list(IMAGE_WITH_MASK_LIST)
        .respond("pdfimages -png", 1, "", "I/O Error: Couldn't open file");

    let err = extract_images(
        &runner,
        &pdf,
        output_dir.path(),
        &CompositionOptions::default(),
    )
    .unwrap_err();

    match &err {
        PietroError::Document { document, path, .. } => {
            assert_eq!(document, "doc");
            assert_eq!(path, &pdf);
        }
        other => panic!("expected Document, got {other:?}"),
    }
    assert!(
        err.to_string().contains(&pdf.display().to_string()),
        "message should name the host file, got: {err}"
    );
    assert!(matches!(
        err.root_cause(),
        PietroError::ProcessFailure { stderr, .. } if stderr == "I/O Error: Couldn't open file"
    ));
}

#[test]
fn test_run_all_jobs_isolates_failures() {
    let input_dir = tempdir().expect("create temp dir");
    let output_dir = tempdir().expect("create temp dir");
    let good = touch_pdf(input_dir.path(), "good.pdf");
    let runner = FakeRunner::new()
        .with_image_list(IMAGE_WITH_MASK_LIST)
        .with_dumped_files(&["000.png", "001.png"]);

    let jobs = vec![
        JobConfig {
            input_path: input_dir.path().join("missing.pdf"),
            output_root: output_dir.path().to_path_buf(),
            composition: CompositionOptions::default(),
        },
        JobConfig {
            input_path: good,
            output_root: output_dir.path().to_path_buf(),
            composition: CompositionOptions::default(),
        },
    ];

    let results = run_all_jobs(&runner, &jobs);

    assert_eq!(results.len(), 2);
    assert!(matches!(results[0], Err(PietroError::MissingInputFile(_))));
    let report = results[1].as_ref().expect("second job should succeed");
    assert_eq!(report.document, "good");
    assert!(output_dir.path().join("illustrations/good/0.png").exists());
}
