//! CSV trace and snapshot persistence for the courier demo.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Result;
use csv::Writer;

use gdd_core::SimClock;
use gdd_mobility::Vehicle;
use gdd_sim::{Job, Resource, SessionObserver, SessionSnapshot, VehicleMode};

/// Writes `trace.csv` every `interval` ticks and keeps `session.json` in
/// sync with the latest committed state.
///
/// Observer methods cannot fail, so the first I/O error is stored and
/// surfaced by [`finish`](Self::finish).
pub struct TraceObserver {
    writer:        Writer<File>,
    snapshot_path: PathBuf,
    interval:      u64,
    pub rows:      usize,
    pub saves:     usize,
    pub completed: Vec<Job>,
    last_error:    Option<anyhow::Error>,
}

impl TraceObserver {
    pub fn create(dir: &Path, interval: u64) -> Result<Self> {
        let mut writer = Writer::from_path(dir.join("trace.csv"))?;
        writer.write_record(["tick", "elapsed_s", "lng", "lat", "fuel", "durability", "mode"])?;
        Ok(Self {
            writer,
            snapshot_path: dir.join("session.json"),
            interval: interval.max(1),
            rows: 0,
            saves: 0,
            completed: Vec::new(),
            last_error: None,
        })
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        match self.last_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn store_err(&mut self, result: Result<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl SessionObserver for TraceObserver {
    fn on_tick(&mut self, clock: &SimClock, vehicle: &Vehicle, mode: VehicleMode) {
        if !clock.current_tick.0.is_multiple_of(self.interval) {
            return;
        }
        let result = self
            .writer
            .write_record(&[
                clock.current_tick.0.to_string(),
                format!("{:.1}", clock.elapsed_secs),
                format!("{:.6}", vehicle.pos.lon),
                format!("{:.6}", vehicle.pos.lat),
                format!("{:.3}", vehicle.fuel),
                format!("{:.3}", vehicle.durability),
                mode.to_string(),
            ])
            .map_err(anyhow::Error::from);
        self.rows += 1;
        self.store_err(result);
    }

    fn on_job_completed(&mut self, job: &Job) {
        self.completed.push(job.clone());
    }

    fn on_resource_depleted(&mut self, resource: Resource, vehicle: &Vehicle) {
        println!("  !! {resource:?} depleted at {}", vehicle.pos);
    }

    fn on_persist(&mut self, snapshot: &SessionSnapshot) {
        let result = snapshot
            .to_json()
            .map_err(anyhow::Error::from)
            .and_then(|text| Ok(fs::write(&self.snapshot_path, text)?));
        self.saves += 1;
        self.store_err(result);
    }
}
