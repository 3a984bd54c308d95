// Report writer
// Persists figures as text tables and JSON series inside an output directory

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::data::SplitKind;
use crate::observer::calculate_sha256;

use super::figures::Figures;
use super::style::RenderStyle;
use super::{RenderResult, Renderer};

/// A file produced by the writer and the SHA256 of its contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub sha256: String,
}

/// Renders figures to plain files that plotting tools can pick up:
/// `errors.txt`, `mse.txt`, `<split>.scores.txt` and `figures.json`
pub struct ReportWriter {
    dir: PathBuf,
    style: RenderStyle,
    written: Vec<WrittenFile>,
}

impl ReportWriter {
    pub fn new(dir: PathBuf) -> Self {
        ReportWriter {
            dir,
            style: RenderStyle::default(),
            written: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in write order
    pub fn written(&self) -> &[WrittenFile] {
        &self.written
    }

    /// Store a file in the output directory and record its path and SHA256 hash
    fn store_file(&mut self, filename: &str, data: &[u8]) -> RenderResult<()> {
        fs::create_dir_all(&self.dir)?;
        let file_path = self.dir.join(filename);

        let mut file = fs::File::create(&file_path)?;
        file.write_all(data)?;

        let sha256 = calculate_sha256(data);
        log::info!("Wrote {} (sha256 {})", file_path.display(), sha256);
        self.written.push(WrittenFile {
            path: file_path,
            sha256,
        });

        Ok(())
    }
}

#[derive(Serialize)]
struct FiguresDocument<'a> {
    figures: &'a Figures,
    style: &'a RenderStyle,
}

/// `step train devel test` rows; all splits share the same steps
pub fn mse_table(figures: &Figures) -> String {
    let mut out = String::from("step train devel test\n");
    let rows = figures
        .mse
        .train
        .iter()
        .zip(&figures.mse.devel)
        .zip(&figures.mse.test);

    for ((&(step, train), &(_, devel)), &(_, test)) in rows {
        out.push_str(&format!("{} {:.6e} {:.6e} {:.6e}\n", step, train, devel, test));
    }
    out
}

/// One `label score` row per labeled example
pub fn score_table(figures: &Figures, kind: SplitKind) -> String {
    let mut out = String::new();
    for example in figures.scores.get(kind) {
        out.push_str(&format!("{} {:.6e}\n", example.label.name(), example.score));
    }
    out
}

impl Renderer for ReportWriter {
    fn render(&mut self, figures: &Figures) -> RenderResult<()> {
        self.store_file("errors.txt", format!("{}\n", figures.report).as_bytes())?;
        self.store_file("mse.txt", mse_table(figures).as_bytes())?;

        for kind in SplitKind::ALL {
            let filename = format!("{}.scores.txt", kind.name());
            self.store_file(&filename, score_table(figures, kind).as_bytes())?;
        }

        let json = serde_json::to_vec_pretty(&FiguresDocument {
            figures,
            style: &self.style,
        })?;
        self.store_file("figures.json", &json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analyzer, ThresholdGrid};
    use crate::classifier::LinearClassifier;
    use crate::data::split::fixtures;
    use crate::observer::Observer;
    use crate::render::RenderError;
    use tempfile::TempDir;

    fn figures() -> Figures {
        let mut observer = Observer::new(fixtures::splits());
        observer
            .evaluate(&LinearClassifier::new(vec![1.0, 0.0], 0.0), 1)
            .unwrap();
        observer
            .evaluate(&LinearClassifier::new(vec![0.5, 0.0], 0.0), 2)
            .unwrap();
        let analyzer = Analyzer::new(&observer, ThresholdGrid::default()).unwrap();
        Figures::from_analyzer(&analyzer, "test run")
    }

    #[test]
    fn test_writes_every_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = ReportWriter::new(temp_dir.path().join("report"));

        writer.render(&figures()).unwrap();

        let names: Vec<String> = writer
            .written()
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "errors.txt",
                "mse.txt",
                "train.scores.txt",
                "devel.scores.txt",
                "test.scores.txt",
                "figures.json"
            ]
        );
        for file in writer.written() {
            let data = fs::read(&file.path).unwrap();
            assert_eq!(calculate_sha256(&data), file.sha256);
        }
    }

    #[test]
    fn test_error_table_content() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = ReportWriter::new(temp_dir.path().to_path_buf());
        writer.render(&figures()).unwrap();

        let text = fs::read_to_string(temp_dir.path().join("errors.txt")).unwrap();
        assert!(text.starts_with("          |     FAR %"));
        assert!(text.contains("Min. HTER |"));
        assert!(text.trim_end().ends_with("applied to the test set."));
    }

    #[test]
    fn test_mse_table_rows() {
        let table = mse_table(&figures());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "step train devel test");
        assert!(lines[1].starts_with("1 "));
        assert!(lines[2].starts_with("2 "));
    }

    #[test]
    fn test_score_table_rows() {
        let table = score_table(&figures(), SplitKind::Devel);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("noise "));
        assert!(lines[5].starts_with("signal "));
    }

    #[test]
    fn test_figures_json_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = ReportWriter::new(temp_dir.path().to_path_buf());
        let figures = figures();
        writer.render(&figures).unwrap();

        let data = fs::read(temp_dir.path().join("figures.json")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&data).unwrap();
        let parsed: Figures = serde_json::from_value(value["figures"].clone()).unwrap();

        assert_eq!(parsed.report.min_hter.index, figures.report.min_hter.index);
        assert_eq!(parsed.curves.test.far.len(), figures.curves.test.far.len());
        assert_eq!(value["style"]["test"]["color"], "black");
    }

    #[test]
    fn test_unwritable_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let mut writer = ReportWriter::new(blocker.join("report"));
        let result = writer.render(&figures());

        assert!(matches!(result, Err(RenderError::Io(_))));
        assert!(writer.written().is_empty());
    }
}
