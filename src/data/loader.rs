// ============================================================
// Layer 4 — Digits Loader
// ============================================================
// Loads the handwritten digits collection: 1797 labelled 8×8
// images, 64 pixel intensities (0..=16) followed by the digit.
//
// The reference copy ships inside the binary (include_str!) so
// both workflows always see the same data without network or
// filesystem access. A CSV on disk with the same layout can be
// supplied instead:
//
//   p0,p1,...,p63,label
//   0,0,5,13,9,1,0,0,...,0,0
//
// Blank lines are skipped; there is no header row.
//
// Reference: UCI Optical Recognition of Handwritten Digits
//            Rust Book §8 (Strings), §9 (Error Handling)

use anyhow::Result;
use std::{fs, path::PathBuf};

use crate::domain::error::PipelineError;
use crate::domain::sample::{DigitSample, PIXELS_PER_IMAGE};
use crate::domain::traits::SampleSource;

/// The bundled reference dataset
const BUNDLED_DIGITS: &str = include_str!("../../data/digits.csv");

/// Where the samples come from
#[derive(Debug, Clone)]
enum Origin {
    Bundled,
    File(PathBuf),
}

/// Loads digit samples from the bundled copy or a CSV file.
/// Implements the SampleSource trait from Layer 3.
#[derive(Debug, Clone)]
pub struct DigitsLoader {
    origin: Origin,
}

impl DigitsLoader {
    /// Loader over the copy compiled into the binary
    pub fn bundled() -> Self {
        Self { origin: Origin::Bundled }
    }

    /// Loader over a CSV file on disk
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { origin: Origin::File(path.into()) }
    }

    /// Bundled data unless an override path is given
    pub fn new(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::from_path(path),
            None       => Self::bundled(),
        }
    }

    fn describe(&self) -> String {
        match &self.origin {
            Origin::Bundled    => "bundled digits".to_string(),
            Origin::File(path) => path.display().to_string(),
        }
    }
}

impl SampleSource for DigitsLoader {
    fn load_all(&self) -> Result<Vec<DigitSample>> {
        let samples = match &self.origin {
            Origin::Bundled => parse_csv(BUNDLED_DIGITS)?,
            Origin::File(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    PipelineError::DatasetUnavailable(format!(
                        "cannot read '{}': {e}",
                        path.display()
                    ))
                })?;
                let samples = parse_csv(&text)?;
                if let Some(first) = samples.first().filter(|s| s.n_features() != PIXELS_PER_IMAGE) {
                    tracing::warn!(
                        "'{}' rows carry {} features; 8×8 digit images have {}",
                        path.display(),
                        first.n_features(),
                        PIXELS_PER_IMAGE,
                    );
                }
                samples
            }
        };

        tracing::debug!("Loaded {} samples from {}", samples.len(), self.describe());
        Ok(samples)
    }
}

/// Parse `features..., label` rows. Every row must carry the same
/// number of features as the first one.
fn parse_csv(text: &str) -> Result<Vec<DigitSample>, PipelineError> {
    let mut samples: Vec<DigitSample> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let Some((label_field, pixel_fields)) = fields.split_last() else {
            continue;
        };

        if pixel_fields.is_empty() {
            return Err(malformed(line_no, "row has no feature columns"));
        }

        let label = label_field
            .parse::<usize>()
            .map_err(|_| malformed(line_no, &format!("label '{label_field}' is not a class index")))?;

        let pixels = pixel_fields
            .iter()
            .map(|f| f.parse::<f32>())
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| malformed(line_no, &format!("bad feature value: {e}")))?;

        if let Some(first) = samples.first() {
            if first.n_features() != pixels.len() {
                return Err(malformed(
                    line_no,
                    &format!("expected {} features, found {}", first.n_features(), pixels.len()),
                ));
            }
        }

        samples.push(DigitSample::new(pixels, label));
    }

    if samples.is_empty() {
        return Err(PipelineError::DatasetUnavailable("dataset contains no samples".to_string()));
    }
    Ok(samples)
}

fn malformed(line_no: usize, reason: &str) -> PipelineError {
    PipelineError::DatasetUnavailable(format!("line {}: {reason}", line_no + 1))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundled_dataset_shape() {
        let samples = DigitsLoader::bundled().load_all().unwrap();
        assert_eq!(samples.len(), 1797);
        assert!(samples.iter().all(|s| s.n_features() == PIXELS_PER_IMAGE));
        assert!(samples.iter().all(|s| s.label <= 9));
    }

    #[test]
    fn test_bundled_first_rows() {
        let samples = DigitsLoader::bundled().load_all().unwrap();
        // The collection starts 0, 1, 2, ... 9, 0, 1 ...
        let first: Vec<usize> = samples.iter().take(12).map(|s| s.label).collect();
        assert_eq!(first, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1]);
        assert_eq!(&samples[0].pixels[..4], &[0.0, 0.0, 5.0, 13.0]);
    }

    #[test]
    fn test_csv_file_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1,2,3,7").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "4,5,6,1").unwrap();

        let samples = DigitsLoader::from_path(file.path()).load_all().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], DigitSample::new(vec![1.0, 2.0, 3.0], 7));
        assert_eq!(samples[1].label, 1);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = DigitsLoader::from_path("does/not/exist.csv").load_all().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::DatasetUnavailable(_))
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(parse_csv("1,2,3,0\n1,2,0\n").is_err());
        assert!(parse_csv("1,2,x,0\n").is_err());
        assert!(parse_csv("1,2,3,-1\n").is_err());
        assert!(parse_csv("\n\n").is_err());
    }
}
