//! Service that runs one conversion batch from start to finish.
//!
//! Items are converted one after another in the order the user picked them.
//! A failed item is recorded and skipped; only a missing HTML renderer stops
//! the batch early. The sink always receives exactly one completion.

use crate::converters::Converters;
use crate::error::{ConvertError, Result};
use crate::file_utils::{self, PathExt};
use crate::job::{ConversionJob, ConversionKind, ConversionOutcome, FailedItem, Progress};
use log::{debug, error, info, warn};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Receives batch updates, possibly from a worker thread.
///
/// Implementations must hand the update over to their own thread instead of
/// touching presentation state directly.
pub trait ProgressSink: Send {
    fn on_started(&self, _total: usize) {}

    fn on_item_started(&self, _index: usize, _total: usize, _path: &Path) {}

    fn on_progress(&self, progress: Progress);

    fn on_complete(&self, outcome: ConversionOutcome);
}

/// Runs conversion batches against a fixed set of converters.
#[derive(Clone)]
pub struct BatchService {
    converters: Arc<Converters>,
}

impl BatchService {
    pub fn new(converters: Arc<Converters>) -> Self {
        Self { converters }
    }

    /// Converts every input of `job` and reports through `sink`.
    pub fn run(&self, job: ConversionJob, sink: &dyn ProgressSink) -> ConversionOutcome {
        let kind = job.kind();
        let total = job.inputs().len();
        let mut outcome = ConversionOutcome::new(total);

        info!(
            "Batch started: {} file(s) -> {} ({:?})",
            total,
            job.output_dir().display(),
            kind
        );
        sink.on_started(total);

        for (index, input) in job.inputs().iter().enumerate() {
            sink.on_item_started(index, total, input);
            outcome.attempted += 1;

            match self.convert_one(kind, input, job.output_dir()) {
                Ok(()) => {
                    debug!("Converted {}", input.format_for_log());
                    outcome.succeeded += 1;
                }
                Err(e) if e.is_systemic() && kind == ConversionKind::HtmlToRaster => {
                    error!("Batch aborted at {}: {}", input.format_for_log(), e);
                    outcome.systemic_failure = Some(e.to_string());
                    break;
                }
                Err(e) => {
                    warn!("Error ({}): {}", input.display(), e);
                    outcome.failures.push(FailedItem {
                        path: input.clone(),
                        reason: e.to_string(),
                    });
                }
            }

            sink.on_progress(Progress {
                completed: index + 1,
                total,
                current: input.clone(),
            });
        }

        info!(
            "Batch finished: {}/{} succeeded, {} failed{}",
            outcome.succeeded,
            outcome.total,
            outcome.failures.len(),
            if outcome.is_aborted() { ", aborted" } else { "" }
        );
        sink.on_complete(outcome.clone());
        outcome
    }

    /// Converts a single input into `output_dir`.
    fn convert_one(&self, kind: ConversionKind, input: &Path, output_dir: &Path) -> Result<()> {
        let output = file_utils::output_path_for(input, output_dir, kind.target_extension())?;

        match kind {
            ConversionKind::PdfToDocument => self.converters.pdf.convert(input, &output),
            ConversionKind::DocumentToPdf => self.export_pdf(input, &output),
            ConversionKind::Image(params) => self.converters.images.reencode(input, &output, &params),
            ConversionKind::HtmlToRaster => self.converters.html.render(input, &output),
        }
    }

    /// Word to PDF, judged by the file left on disk rather than the call result.
    ///
    /// The host writes into a scratch directory next to `output`; only a
    /// non-empty result replaces `output`, so a failed export never touches
    /// an existing PDF.
    fn export_pdf(&self, input: &Path, output: &Path) -> Result<()> {
        let (output_dir, file_name) = output
            .parent()
            .zip(output.file_name())
            .ok_or_else(|| ConvertError::InvalidInput(output.to_path_buf()))?;

        let staging = tempfile::Builder::new()
            .prefix(".pdf-export-")
            .tempdir_in(output_dir)?;
        let staged = staging.path().join(file_name);
        let call_result = self.converters.office.convert(input, &staged);

        if file_utils::is_nonempty_file(&staged) {
            if let Err(e) = call_result {
                warn!(
                    "PDF export of {} reported an error but produced output: {}",
                    input.format_for_log(),
                    e
                );
            }
            fs::rename(&staged, output)?;
            return Ok(());
        }

        Err(match call_result {
            Err(ConvertError::HostUnavailable(msg)) => ConvertError::HostUnavailable(msg),
            Err(e) => ConvertError::HostUnavailable(e.to_string()),
            Ok(()) => ConvertError::HostUnavailable("no PDF was produced".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ICON_SIZES, JPEG_QUALITY};
    use crate::converters::{DocumentToPdf, HtmlRenderer, ImageCodec, PdfToDocument};
    use crate::job::{ImageParams, ImageTarget, PixelMode};
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records everything the batch reports.
    #[derive(Default)]
    struct RecordingSink {
        started: Mutex<Vec<usize>>,
        items: Mutex<Vec<PathBuf>>,
        progress: Mutex<Vec<Progress>>,
        completions: Mutex<Vec<ConversionOutcome>>,
    }

    impl ProgressSink for RecordingSink {
        fn on_started(&self, total: usize) {
            self.started.lock().unwrap().push(total);
        }

        fn on_item_started(&self, _index: usize, _total: usize, path: &Path) {
            self.items.lock().unwrap().push(path.to_path_buf());
        }

        fn on_progress(&self, progress: Progress) {
            self.progress.lock().unwrap().push(progress);
        }

        fn on_complete(&self, outcome: ConversionOutcome) {
            self.completions.lock().unwrap().push(outcome);
        }
    }

    /// Writes `payload` to the destination, or fails for inputs named "bad".
    struct FakeTool {
        payload: &'static [u8],
        calls: AtomicUsize,
    }

    impl FakeTool {
        fn new(payload: &'static [u8]) -> Self {
            Self {
                payload,
                calls: AtomicUsize::new(0),
            }
        }

        fn run(&self, source: &Path, destination: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if source.file_stem().is_some_and(|s| s == "bad") {
                return Err(ConvertError::ToolFailed {
                    tool: "fake".into(),
                    status: Some(1),
                    stderr: "cannot open".into(),
                });
            }
            fs::write(destination, self.payload)?;
            Ok(())
        }
    }

    impl PdfToDocument for Arc<FakeTool> {
        fn convert(&self, source: &Path, destination: &Path) -> Result<()> {
            self.run(source, destination)
        }
    }

    impl DocumentToPdf for Arc<FakeTool> {
        fn convert(&self, source: &Path, destination: &Path) -> Result<()> {
            self.run(source, destination)
        }
    }

    impl HtmlRenderer for Arc<FakeTool> {
        fn render(&self, source: &Path, destination: &Path) -> Result<()> {
            self.run(source, destination)
        }
    }

    /// Renderer whose executable has disappeared.
    struct MissingRenderer {
        calls: Arc<AtomicUsize>,
    }

    impl HtmlRenderer for MissingRenderer {
        fn render(&self, _source: &Path, _destination: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ConvertError::RendererMissing("wkhtmltoimage".into()))
        }
    }

    /// Word stand-in that reports success but writes nothing.
    struct SilentOffice;

    impl DocumentToPdf for SilentOffice {
        fn convert(&self, _source: &Path, _destination: &Path) -> Result<()> {
            Ok(())
        }
    }

    /// Word stand-in that leaves a zero-byte file and reports no error.
    struct EmptyFileOffice;

    impl DocumentToPdf for EmptyFileOffice {
        fn convert(&self, _source: &Path, destination: &Path) -> Result<()> {
            fs::write(destination, b"")?;
            Ok(())
        }
    }

    /// Host application not installed at all.
    struct AbsentOffice;

    impl DocumentToPdf for AbsentOffice {
        fn convert(&self, _source: &Path, _destination: &Path) -> Result<()> {
            Err(ConvertError::HostUnavailable("soffice is not installed".into()))
        }
    }

    fn converters_with(
        office: Box<dyn DocumentToPdf>,
        html: Box<dyn HtmlRenderer>,
    ) -> Arc<Converters> {
        Arc::new(Converters {
            pdf: Box::new(Arc::new(FakeTool::new(b"PK docx"))),
            office,
            html,
            images: ImageCodec::new(false),
        })
    }

    fn default_converters() -> Arc<Converters> {
        converters_with(
            Box::new(Arc::new(FakeTool::new(b"%PDF-1.7"))),
            Box::new(Arc::new(FakeTool::new(b"\x89PNG"))),
        )
    }

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        path
    }

    fn png_to_jpg() -> ConversionKind {
        ConversionKind::Image(
            ImageParams::new(ImageTarget::Jpeg)
                .with_mode(PixelMode::Rgb)
                .with_quality(JPEG_QUALITY),
        )
    }

    #[test]
    fn png_batch_writes_jpgs_named_after_inputs() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            write_png(input_dir.path(), "a.png"),
            write_png(input_dir.path(), "b.png"),
        ];

        let sink = RecordingSink::default();
        let job = ConversionJob::new(inputs, output_dir.path().to_path_buf(), png_to_jpg());
        let outcome = BatchService::new(default_converters()).run(job, &sink);

        assert_eq!((outcome.succeeded, outcome.total), (2, 2));
        assert!(outcome.failures.is_empty());
        for name in ["a.jpg", "b.jpg"] {
            let written = output_dir.path().join(name);
            assert_eq!(
                image::guess_format(&fs::read(&written).unwrap()).unwrap(),
                ImageFormat::Jpeg
            );
        }
        assert_eq!(sink.completions.lock().unwrap().as_slice(), [outcome]);
    }

    #[test]
    fn progress_is_reported_after_each_item_in_order() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let inputs: Vec<_> = ["c.png", "a.png", "b.png"]
            .iter()
            .map(|name| write_png(input_dir.path(), name))
            .collect();

        let sink = RecordingSink::default();
        let job = ConversionJob::new(inputs.clone(), output_dir.path().to_path_buf(), png_to_jpg());
        BatchService::new(default_converters()).run(job, &sink);

        assert_eq!(sink.started.lock().unwrap().as_slice(), [3]);
        assert_eq!(sink.items.lock().unwrap().as_slice(), inputs.as_slice());
        let progress = sink.progress.lock().unwrap();
        let fractions: Vec<f32> = progress.iter().map(Progress::fraction).collect();
        assert_eq!(fractions, [1.0 / 3.0, 2.0 / 3.0, 1.0]);
        let currents: Vec<_> = progress.iter().map(|p| p.current.clone()).collect();
        assert_eq!(currents, inputs);
    }

    #[test]
    fn image_batch_outputs_keep_base_names_and_target_extension() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            write_png(input_dir.path(), "logo.png"),
            write_png(input_dir.path(), "Icon.Large.png"),
        ];
        let kind = ConversionKind::Image(ImageParams::new(ImageTarget::Ico).with_icon_sizes(&ICON_SIZES));

        let sink = RecordingSink::default();
        let job = ConversionJob::new(inputs.clone(), output_dir.path().to_path_buf(), kind);
        let outcome = BatchService::new(default_converters()).run(job, &sink);
        assert_eq!(outcome.succeeded, 2);

        for input in &inputs {
            let expected = file_utils::output_path_for(input, output_dir.path(), "ico").unwrap();
            assert!(expected.exists(), "missing {}", expected.display());
        }
        assert!(output_dir.path().join("Icon.Large.ico").exists());
    }

    #[test]
    fn failed_item_is_recorded_and_batch_continues() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let good = write_png(input_dir.path(), "good.png");
        let corrupt = input_dir.path().join("corrupt.png");
        fs::write(&corrupt, b"garbage").unwrap();
        let later = write_png(input_dir.path(), "later.png");

        let sink = RecordingSink::default();
        let job = ConversionJob::new(
            vec![good, corrupt.clone(), later],
            output_dir.path().to_path_buf(),
            png_to_jpg(),
        );
        let outcome = BatchService::new(default_converters()).run(job, &sink);

        assert_eq!((outcome.attempted, outcome.succeeded, outcome.total), (3, 2, 3));
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].path, corrupt);
        assert!(output_dir.path().join("later.jpg").exists());
        assert_eq!(sink.progress.lock().unwrap().len(), 3);
    }

    #[test]
    fn pdf_to_document_calls_converter_once_per_file() {
        let output_dir = tempfile::tempdir().unwrap();
        let tool = Arc::new(FakeTool::new(b"PK docx"));
        let converters = Arc::new(Converters {
            pdf: Box::new(tool.clone()),
            office: Box::new(SilentOffice),
            html: Box::new(SilentRendererStub),
            images: ImageCodec::new(false),
        });

        let job = ConversionJob::new(
            vec!["in/one.pdf".into(), "in/bad.pdf".into(), "in/two.pdf".into()],
            output_dir.path().to_path_buf(),
            ConversionKind::PdfToDocument,
        );
        let outcome = BatchService::new(converters).run(job, &RecordingSink::default());

        assert_eq!(tool.calls.load(Ordering::SeqCst), 3);
        assert_eq!(outcome.succeeded, 2);
        assert!(output_dir.path().join("one.docx").exists());
        assert!(output_dir.path().join("two.docx").exists());
        assert_eq!(outcome.failures[0].path, PathBuf::from("in/bad.pdf"));
    }

    struct SilentRendererStub;

    impl HtmlRenderer for SilentRendererStub {
        fn render(&self, _source: &Path, _destination: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn pdf_export_without_output_counts_as_failure() {
        for office in [
            Box::new(SilentOffice) as Box<dyn DocumentToPdf>,
            Box::new(EmptyFileOffice),
            Box::new(AbsentOffice),
        ] {
            let output_dir = tempfile::tempdir().unwrap();
            let converters = converters_with(office, Box::new(SilentRendererStub));
            let job = ConversionJob::new(
                vec!["x.docx".into()],
                output_dir.path().to_path_buf(),
                ConversionKind::DocumentToPdf,
            );
            let outcome = BatchService::new(converters).run(job, &RecordingSink::default());

            assert_eq!((outcome.succeeded, outcome.total), (0, 1));
            assert_eq!(outcome.failures.len(), 1);
            assert!(
                outcome.failures[0].reason.contains("office application"),
                "{}",
                outcome.failures[0].reason
            );
        }
    }

    #[test]
    fn failed_export_leaves_existing_pdf_untouched() {
        for office in [
            Box::new(SilentOffice) as Box<dyn DocumentToPdf>,
            Box::new(EmptyFileOffice),
            Box::new(AbsentOffice),
        ] {
            let output_dir = tempfile::tempdir().unwrap();
            let existing = output_dir.path().join("report.pdf");
            fs::write(&existing, b"%PDF from yesterday").unwrap();

            let converters = converters_with(office, Box::new(SilentRendererStub));
            let job = ConversionJob::new(
                vec!["report.docx".into()],
                output_dir.path().to_path_buf(),
                ConversionKind::DocumentToPdf,
            );
            let outcome = BatchService::new(converters).run(job, &RecordingSink::default());

            assert_eq!(outcome.succeeded, 0);
            assert_eq!(fs::read(&existing).unwrap(), b"%PDF from yesterday");
            let leftovers = fs::read_dir(output_dir.path()).unwrap().count();
            assert_eq!(leftovers, 1, "scratch directory was not cleaned up");
        }
    }

    #[test]
    fn successful_export_replaces_existing_pdf() {
        let output_dir = tempfile::tempdir().unwrap();
        let existing = output_dir.path().join("report.pdf");
        fs::write(&existing, b"%PDF from yesterday").unwrap();

        let job = ConversionJob::new(
            vec!["docs/report.docx".into()],
            output_dir.path().to_path_buf(),
            ConversionKind::DocumentToPdf,
        );
        let outcome = BatchService::new(default_converters()).run(job, &RecordingSink::default());

        assert_eq!(outcome.succeeded, 1);
        assert_eq!(fs::read(&existing).unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn pdf_export_with_output_succeeds() {
        let output_dir = tempfile::tempdir().unwrap();
        let job = ConversionJob::new(
            vec!["docs/x.docx".into()],
            output_dir.path().to_path_buf(),
            ConversionKind::DocumentToPdf,
        );
        let outcome = BatchService::new(default_converters()).run(job, &RecordingSink::default());

        assert_eq!((outcome.succeeded, outcome.total), (1, 1));
        assert!(file_utils::is_nonempty_file(&output_dir.path().join("x.pdf")));
    }

    #[test]
    fn missing_renderer_aborts_remaining_html_items() {
        let output_dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let converters = converters_with(
            Box::new(SilentOffice),
            Box::new(MissingRenderer {
                calls: calls.clone(),
            }),
        );

        let sink = RecordingSink::default();
        let job = ConversionJob::new(
            vec!["a.html".into(), "b.html".into(), "c.html".into()],
            output_dir.path().to_path_buf(),
            ConversionKind::HtmlToRaster,
        );
        let outcome = BatchService::new(converters).run(job, &sink);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!((outcome.attempted, outcome.succeeded, outcome.total), (1, 0, 3));
        assert!(outcome.failures.is_empty());
        assert!(outcome.systemic_failure.as_deref().unwrap().contains("wkhtmltoimage"));
        assert!(sink.progress.lock().unwrap().is_empty());
        assert_eq!(sink.completions.lock().unwrap().len(), 1);
    }

    #[test]
    fn html_render_errors_are_per_item() {
        let output_dir = tempfile::tempdir().unwrap();
        let job = ConversionJob::new(
            vec!["bad.html".into(), "page.html".into()],
            output_dir.path().to_path_buf(),
            ConversionKind::HtmlToRaster,
        );
        let outcome = BatchService::new(default_converters()).run(job, &RecordingSink::default());

        assert_eq!((outcome.succeeded, outcome.total), (1, 2));
        assert!(!outcome.is_aborted());
        assert!(output_dir.path().join("page.png").exists());
    }

    #[test]
    fn empty_batch_still_completes_once() {
        let output_dir = tempfile::tempdir().unwrap();
        let sink = RecordingSink::default();
        let job = ConversionJob::new(
            Vec::new(),
            output_dir.path().to_path_buf(),
            ConversionKind::PdfToDocument,
        );
        let outcome = BatchService::new(default_converters()).run(job, &sink);

        assert_eq!(outcome, ConversionOutcome::new(0));
        assert_eq!(sink.completions.lock().unwrap().len(), 1);
        assert!(sink.progress.lock().unwrap().is_empty());
    }

    #[test]
    fn all_failures_still_complete_once() {
        let output_dir = tempfile::tempdir().unwrap();
        let sink = RecordingSink::default();
        let job = ConversionJob::new(
            vec!["missing/one.png".into(), "missing/two.png".into()],
            output_dir.path().to_path_buf(),
            png_to_jpg(),
        );
        let outcome = BatchService::new(default_converters()).run(job, &sink);

        assert_eq!(outcome.succeeded, 0);
        assert_eq!(outcome.failures.len(), 2);
        assert!(outcome.succeeded <= outcome.total);
        assert_eq!(sink.completions.lock().unwrap().len(), 1);
    }
}
