//! Hourly wet-bulb series from CSV.
//!
//! Column names vary between weather sources, so the wet-bulb, timestamp and
//! dry-bulb columns are matched against known header spellings: exact match
//! first, then case-insensitive. Rows whose wet bulb does not parse are
//! skipped.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ProjectError, ProjectResult};

pub const WET_BULB_COLUMNS: [&str; 9] = [
    "wet_bulb_temp_C",
    "t_wb",
    "wet_bulb",
    "wetbulb",
    "wb_temp",
    "temperature_wb",
    "T_wb",
    "wet_bulb_temperature",
    "WetBulbTemp",
];

pub const TIMESTAMP_COLUMNS: [&str; 7] = ["timestamp", "datetime", "time", "date", "DateTime", "Time", "Date"];

pub const DRY_BULB_COLUMNS: [&str; 5] = ["dry_bulb_temp_C", "t_db", "dry_bulb", "drybulb", "T_db"];

/// One weather observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPoint {
    pub timestamp: String,
    pub t_wb_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_db_c: Option<f64>,
}

/// Parsed weather file.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSeries {
    points: Vec<WeatherPoint>,
    wet_bulb_column: String,
    timestamp_column: Option<String>,
    dry_bulb_column: Option<String>,
}

fn split_row(line: &str) -> Vec<&str> {
    line.split(',').map(|f| f.trim().trim_matches('"')).collect()
}

fn find_column(headers: &[&str], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|c| headers.iter().position(|h| h == c))
        .or_else(|| {
            candidates
                .iter()
                .find_map(|c| headers.iter().position(|h| h.eq_ignore_ascii_case(c)))
        })
}

impl WeatherSeries {
    pub fn load(path: &Path) -> ProjectResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv_str(&content).map_err(|e| match e {
            ProjectError::Weather { what } => ProjectError::Weather {
                what: format!("{}: {what}", path.display()),
            },
            other => other,
        })
    }

    pub fn from_csv_str(content: &str) -> ProjectResult<Self> {
        let mut lines = content.lines().filter(|l| !l.trim().is_empty());
        let header_line = lines.next().ok_or_else(|| ProjectError::Weather {
            what: "file has no header".to_string(),
        })?;
        let headers = split_row(header_line);

        let wb = find_column(&headers, &WET_BULB_COLUMNS).ok_or_else(|| ProjectError::Weather {
            what: format!(
                "no wet-bulb column; found {:?}, expected one of {:?}",
                headers, WET_BULB_COLUMNS
            ),
        })?;
        let ts = find_column(&headers, &TIMESTAMP_COLUMNS);
        let db = find_column(&headers, &DRY_BULB_COLUMNS);

        let points: Vec<WeatherPoint> = lines
            .filter_map(|line| {
                let fields = split_row(line);
                let t_wb_c = fields.get(wb)?.parse::<f64>().ok().filter(|t| t.is_finite())?;
                Some(WeatherPoint {
                    timestamp: ts
                        .and_then(|i| fields.get(i))
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    t_wb_c,
                    t_db_c: db
                        .and_then(|i| fields.get(i))
                        .and_then(|s| s.parse::<f64>().ok()),
                })
            })
            .collect();

        if points.is_empty() {
            return Err(ProjectError::Weather {
                what: "no valid data rows".to_string(),
            });
        }

        Ok(Self {
            points,
            wet_bulb_column: headers[wb].to_string(),
            timestamp_column: ts.map(|i| headers[i].to_string()),
            dry_bulb_column: db.map(|i| headers[i].to_string()),
        })
    }

    pub fn points(&self) -> &[WeatherPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn wet_bulb_column(&self) -> &str {
        &self.wet_bulb_column
    }

    pub fn timestamp_column(&self) -> Option<&str> {
        self.timestamp_column.as_deref()
    }

    pub fn dry_bulb_column(&self) -> Option<&str> {
        self.dry_bulb_column.as_deref()
    }

    pub fn wet_bulbs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.t_wb_c)
    }

    pub fn average_wet_bulb(&self) -> f64 {
        self.wet_bulbs().sum::<f64>() / self.points.len() as f64
    }

    /// `(min, max)` wet bulb [°C].
    pub fn wet_bulb_range(&self) -> (f64, f64) {
        self.wet_bulbs()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(t), hi.max(t)))
    }

    pub fn wet_bulb_at(&self, index: usize) -> ProjectResult<f64> {
        self.points
            .get(index)
            .map(|p| p.t_wb_c)
            .ok_or_else(|| ProjectError::Weather {
                what: format!("index {index} out of range (0..{})", self.points.len()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_canonical_columns() {
        let csv = "timestamp,wet_bulb_temp_C\n2024-07-01 00:00,22.0\n2024-07-01 01:00,24.0\n";
        let series = WeatherSeries::from_csv_str(csv).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].timestamp, "2024-07-01 00:00");
        assert_relative_eq!(series.average_wet_bulb(), 23.0);
        assert_eq!(series.wet_bulb_range(), (22.0, 24.0));
        assert_eq!(series.timestamp_column(), Some("timestamp"));
    }

    #[test]
    fn case_insensitive_fallback_and_dry_bulb() {
        let csv = "Time,WETBULB,T_db\n1,20.5,30.1\n2,21.0,\n";
        let series = WeatherSeries::from_csv_str(csv).unwrap();
        assert_eq!(series.wet_bulb_column(), "WETBULB");
        assert_eq!(series.points()[0].t_db_c, Some(30.1));
        assert_eq!(series.points()[1].t_db_c, None);
    }

    #[test]
    fn skips_bad_rows() {
        let csv = "datetime,t_wb\na,n/a\nb,19.0\nc\n";
        let series = WeatherSeries::from_csv_str(csv).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.wet_bulb_at(0).unwrap(), 19.0);
        assert!(series.wet_bulb_at(1).is_err());
    }

    #[test]
    fn missing_column_or_data_fails() {
        assert!(WeatherSeries::from_csv_str("timestamp,dry_bulb\n1,30\n").is_err());
        assert!(WeatherSeries::from_csv_str("timestamp,t_wb\n").is_err());
        assert!(WeatherSeries::from_csv_str("").is_err());
    }
}
