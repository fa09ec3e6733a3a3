//! Output writers for simulation results.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::record::GameRecord;

pub struct OutputWriter {
    jsonl: BufWriter<File>,
    csv: csv::Writer<BufWriter<File>>,
    jsonl_path: PathBuf,
    csv_path: PathBuf,
}

fn create(path: &Path) -> std::io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    Ok(BufWriter::new(file))
}

impl OutputWriter {
    pub fn new(output_dir: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = Path::new(output_dir);
        std::fs::create_dir_all(dir)?;

        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let jsonl_path = dir.join(format!("simulation_{stamp}.jsonl"));
        let csv_path = dir.join(format!("simulation_{stamp}_summary.csv"));

        let mut csv = csv::Writer::from_writer(create(&csv_path)?);
        csv.write_record([
            "game", "seed", "mode", "finished", "winner", "steps", "rejected", "duration_ms",
        ])?;

        Ok(Self {
            jsonl: create(&jsonl_path)?,
            csv,
            jsonl_path,
            csv_path,
        })
    }

    pub fn write_game(&mut self, record: &GameRecord) -> Result<(), Box<dyn std::error::Error>> {
        serde_json::to_writer(&mut self.jsonl, record)?;
        self.jsonl.write_all(b"\n")?;

        self.csv.write_record([
            record.game.to_string(),
            record.seed.to_string(),
            format!("{:?}", record.mode),
            record.finished.to_string(),
            record.winner.map(|w| w.to_string()).unwrap_or_default(),
            record.steps.to_string(),
            record.rejected.to_string(),
            format!("{:.3}", record.duration_ms),
        ])?;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.jsonl.flush()?;
        self.csv.flush()?;
        Ok(())
    }

    pub fn jsonl_path(&self) -> &Path {
        &self.jsonl_path
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
