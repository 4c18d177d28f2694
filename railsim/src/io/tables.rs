//! Flat whitespace-separated numeric tables.
//!
//! - waypoints: `x y z` per line
//! - simulation output: fixed-width `t s vs a [ek ep]` per retained step
//! - reference data: `t s vs a` per line after a fixed number of header lines
//!
//! Blank lines and lines starting with `#` are skipped on input.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path as FsPath;

use tracing::debug;

use crate::error::TableError;
use crate::simulation::states::{NVec3, Trajectory};

/// Column width and precision of written tables
const WIDTH: usize = 10;
const PRECISION: usize = 5;

/// Experimental time series (t, s, vs, a)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub t: Vec<f64>,
    pub s: Vec<f64>,
    pub vs: Vec<f64>,
    pub a: Vec<f64>,
}

impl ReferenceData {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

impl From<&Trajectory> for ReferenceData {
    fn from(traj: &Trajectory) -> Self {
        Self {
            t: traj.t.clone(),
            s: traj.s.clone(),
            vs: traj.vs.clone(),
            a: traj.a.clone(),
        }
    }
}

fn open(path: &FsPath) -> Result<BufReader<File>, TableError> {
    let file = File::open(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn create(path: &FsPath) -> Result<BufWriter<File>, TableError> {
    let file = File::create(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// Parse numeric rows with at least `columns` values, skipping the first
/// `skip` lines. Extra columns are ignored.
fn read_rows<R: BufRead>(reader: R, columns: usize, skip: usize) -> Result<Vec<Vec<f64>>, TableError> {
    let mut rows = Vec::new();

    for (index, line) in reader.lines().enumerate().skip(skip) {
        let line = line?;
        let number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let values = trimmed
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|err| TableError::Parse {
                    line: number,
                    message: format!("`{tok}`: {err}"),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        if values.len() < columns {
            return Err(TableError::ColumnCount {
                line: number,
                expected: columns,
                found: values.len(),
            });
        }
        rows.push(values);
    }

    Ok(rows)
}

/// Read `x y z` waypoints, multiplying every coordinate by `scale`
/// (e.g. 0.01 for centimetre files).
pub fn read_waypoints<R: BufRead>(reader: R, scale: f64) -> Result<Vec<NVec3>, TableError> {
    let rows = read_rows(reader, 3, 0)?;
    Ok(rows
        .iter()
        .map(|r| NVec3::new(r[0], r[1], r[2]) * scale)
        .collect())
}

pub fn load_waypoints(path: &FsPath, scale: f64) -> Result<Vec<NVec3>, TableError> {
    let waypoints = read_waypoints(open(path)?, scale)?;
    debug!(path = %path.display(), count = waypoints.len(), "Loaded waypoints");
    Ok(waypoints)
}

pub fn write_waypoints<W: Write>(mut writer: W, waypoints: &[NVec3]) -> Result<(), TableError> {
    for p in waypoints {
        writeln!(
            writer,
            "{:>w$.p$} {:>w$.p$} {:>w$.p$}",
            p.x,
            p.y,
            p.z,
            w = WIDTH,
            p = PRECISION
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_waypoints(path: &FsPath, waypoints: &[NVec3]) -> Result<(), TableError> {
    write_waypoints(create(path)?, waypoints)
}

/// Write one fixed-width row per sample: `t s vs a`, plus `ek ep` when
/// `energy_columns` is set and the trajectory carries energies.
pub fn write_trajectory<W: Write>(mut writer: W, traj: &Trajectory, energy_columns: bool) -> Result<(), TableError> {
    let energy = if energy_columns { traj.energy.as_deref() } else { None };

    for i in 0..traj.len() {
        write!(
            writer,
            "{:>w$.p$} {:>w$.p$} {:>w$.p$} {:>w$.p$}",
            traj.t[i],
            traj.s[i],
            traj.vs[i],
            traj.a[i],
            w = WIDTH,
            p = PRECISION
        )?;
        if let Some(records) = energy {
            write!(
                writer,
                " {:>w$.p$} {:>w$.p$}",
                records[i].kinetic,
                records[i].potential,
                w = WIDTH,
                p = PRECISION
            )?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_trajectory(path: &FsPath, traj: &Trajectory, energy_columns: bool) -> Result<(), TableError> {
    write_trajectory(create(path)?, traj, energy_columns)?;
    debug!(path = %path.display(), rows = traj.len(), "Wrote trajectory");
    Ok(())
}

/// Read a `t s vs a` table after skipping `skip_header` lines
pub fn read_reference<R: BufRead>(reader: R, skip_header: usize) -> Result<ReferenceData, TableError> {
    let rows = read_rows(reader, 4, skip_header)?;
    let mut data = ReferenceData::default();
    for r in rows {
        data.t.push(r[0]);
        data.s.push(r[1]);
        data.vs.push(r[2]);
        data.a.push(r[3]);
    }
    Ok(data)
}

pub fn load_reference(path: &FsPath, skip_header: usize) -> Result<ReferenceData, TableError> {
    let data = read_reference(open(path)?, skip_header)?;
    debug!(path = %path.display(), rows = data.len(), "Loaded reference data");
    Ok(data)
}
