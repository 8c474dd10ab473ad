// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training progress to a CSV file at every report
// interval (every 200 epochs by default).
//
// Metrics recorded per report:
//   - epoch:    the epoch just completed (1-based)
//   - loss:     mean squared error between one-hot targets
//               and softmax outputs over the full training set
//   - accuracy: fraction of training examples whose most
//               probable intent is the labelled one
//
// Output file: <metrics_dir>/metrics.csv
//
// Example CSV output:
//   epoch,loss,accuracy
//   200,0.081200,0.733333
//   400,0.032100,0.933333
//   ...
//
// The numbers are a progress signal only; training always
// runs its full epoch count.
//
// Reference: Rust Book §12 (I/O and File Handling)

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single report point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean squared error over the full training set
    pub loss: f32,

    /// Training-set classification accuracy, in [0.0, 1.0]
    pub accuracy: f32,
}

impl EpochMetrics {
    pub fn new(epoch: usize, loss: f32, accuracy: f32) -> Self {
        Self { epoch, loss, accuracy }
    }
}

/// Logs report points to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");

        // Header only for a new file, so runs can append
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,loss,accuracy")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one report point as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> io::Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(f, "{},{:.6},{:.6}", m.epoch, m.loss, m.accuracy)?;

        tracing::debug!(
            "Logged epoch {} metrics: loss={:.4}, accuracy={:.4}",
            m.epoch,
            m.loss,
            m.accuracy,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_header_and_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(200, 0.5, 0.25)).unwrap();
        logger.log(&EpochMetrics::new(400, 0.125, 1.0)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            "epoch,loss,accuracy",
            "200,0.500000,0.250000",
            "400,0.125000,1.000000",
        ]);
    }

    #[test]
    fn test_appends_across_loggers() {
        let dir = tempfile::tempdir().unwrap();
        MetricsLogger::new(dir.path()).unwrap()
            .log(&EpochMetrics::new(1, 0.1, 0.1)).unwrap();
        let second = MetricsLogger::new(dir.path()).unwrap();
        second.log(&EpochMetrics::new(2, 0.1, 0.1)).unwrap();

        let text = fs::read_to_string(second.csv_path()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
