use std::{fs::OpenOptions, mem, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{boid::BoidKind, error::RecordError, flock::Flock, options::SaveOptions};

// so right now, this is more of a bird data acummulator than a birdwatcher
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BoidData {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub kind: BoidKind,
    pub time: u64,
}

pub struct Birdwatcher {
    locations: Vec<BoidData>,
    render_ticker: u64,
    sample_rate: u64,
}

const PREFIX: &str = "boids-data";

impl Birdwatcher {
    pub fn new(sample_rate: u64) -> Self {
        Birdwatcher {
            locations: Vec::new(),
            render_ticker: 0,
            sample_rate: sample_rate.max(1),
        }
    }

    /// Triggers data collection
    pub fn watch(&mut self, flock: &Flock) {
        if !self.should_sample() {
            return;
        }

        let time = self.render_ticker / self.sample_rate;
        self.locations.extend(flock.view().iter().map(|b| BoidData {
            id: b.id,
            x: b.position.x,
            y: b.position.y,
            z: b.position.z,
            kind: b.kind,
            time,
        }));
    }

    pub fn restart(&mut self) {
        self.locations.clear();
        self.render_ticker = 0;
    }

    pub fn pop_data(&mut self) -> Vec<BoidData> {
        mem::take(&mut self.locations)
    }

    /// Saves the latest data in CSV format, then returns it while emptying the birdwatcher's memory
    ///
    /// Depending on save options, either attempts to overwrite the current file or write's a new timestamped file
    pub fn pop_data_save(&mut self, save_options: &SaveOptions) -> Result<Vec<BoidData>, RecordError> {
        let data = self.pop_data();

        if !save_options.save_locations {
            return Ok(data);
        }

        if let Some(path) = &save_options.save_locations_path {
            let file_path = PathBuf::from(path)
                .join(Birdwatcher::get_dataset_name(save_options, Utc::now()));

            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&file_path)
                .map_err(|source| RecordError::Io {
                    path: file_path.clone(),
                    source,
                })?;
            let mut wtr = csv::Writer::from_writer(file);

            for b in data.iter() {
                wtr.serialize(b)?;
            }
            wtr.flush().map_err(RecordError::Flush)?;

            info!(rows = data.len(), path = %file_path.display(), "saved boid data");
        }

        Ok(data)
    }

    fn get_dataset_name(save_options: &SaveOptions, now: DateTime<Utc>) -> String {
        match save_options.save_locations_timestamp {
            true => {
                let datetime_part = now.timestamp_millis();
                format!(
                    "{prefix}_{datetime}.csv",
                    prefix = PREFIX,
                    datetime = datetime_part
                )
            }
            false => format!("{prefix}.csv", prefix = PREFIX),
        }
    }

    fn should_sample(&mut self) -> bool {
        self.render_ticker += 1;

        self.render_ticker % self.sample_rate == 0
    }
}
