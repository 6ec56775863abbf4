//! Reading generator module for simulating an environmental sensor.
//!
//! Each call fabricates one independent reading with values drawn uniformly
//! from ranges that resemble ambient outdoor conditions.

use chrono::{DateTime, Local, TimeZone};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Layout of `SensorReading::timestamp`, in local wall-clock time.
pub const TIMESTAMP_FORMAT: &str = "Date: %Y-%m-%d Time: %H:%M:%S";

/// Half-open `[min, max)` range for an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: u32,
    pub max: u32,
}

impl IntRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..self.max).contains(&value)
    }

    fn sample(&self, u: f64) -> u32 {
        let span = (self.max - self.min) as f64;
        // floor(u * span) < span for u in [0, 1)
        self.min + (unit(u) * span) as u32
    }
}

/// Half-open `[min, max)` range for a decimal field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

impl FloatRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

/// Fine particulate matter, µg/m³.
pub const PM25_RANGE: IntRange = IntRange::new(10, 60);

/// Coarse particulate matter, µg/m³.
pub const PM10_RANGE: IntRange = IntRange::new(20, 80);

/// Carbon dioxide, ppm.
pub const CO2_RANGE: IntRange = IntRange::new(400, 800);

/// Air temperature, °C.
pub const TEMPERATURE_RANGE: FloatRange = FloatRange {
    min: -5.0,
    max: 30.0,
};

/// Barometric pressure, hPa.
pub const PRESSURE_RANGE: IntRange = IntRange::new(990, 1030);

/// Relative humidity, %.
pub const HUMIDITY_RANGE: IntRange = IntRange::new(30, 100);

/// Decimal places kept on `temperature`.
const TEMPERATURE_DECIMALS: i32 = 2;

/// A single synthetic environmental reading.
///
/// Field names are the wire format: the collection endpoint depends on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Identity of the emitting sensor
    pub sensor_id: String,

    /// Generation time, formatted with [`TIMESTAMP_FORMAT`]
    pub timestamp: String,

    pub pm25: u32,
    pub pm10: u32,
    pub co2: u32,

    /// Rounded to two decimals
    pub temperature: f64,

    pub pressure: u32,
    pub humidity: u32,
}

impl SensorReading {
    /// Check every field against its documented range.
    pub fn is_within_ranges(&self) -> bool {
        PM25_RANGE.contains(self.pm25)
            && PM10_RANGE.contains(self.pm10)
            && CO2_RANGE.contains(self.co2)
            && TEMPERATURE_RANGE.contains(self.temperature)
            && PRESSURE_RANGE.contains(self.pressure)
            && HUMIDITY_RANGE.contains(self.humidity)
    }
}

/// A source of uniform draws in `[0, 1)`.
///
/// Production code uses [`RandSource`]; tests plug in fixed sequences.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;
}

/// Adapter turning any `rand` RNG into a [`UniformSource`].
#[derive(Debug, Clone)]
pub struct RandSource<R>(pub R);

impl<R: Rng> UniformSource for RandSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Draws from `rand::thread_rng()` on every call.
///
/// Holds no RNG handle itself, so generators built on it stay `Send` and can
/// move across tokio worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl UniformSource for ThreadRngSource {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Generator for synthetic sensor readings.
pub struct ReadingGenerator<S> {
    source: S,
}

impl ReadingGenerator<ThreadRngSource> {
    /// Create a generator backed by the thread-local RNG.
    pub fn with_thread_rng() -> Self {
        Self::new(ThreadRngSource)
    }
}

impl<S: UniformSource> ReadingGenerator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Generate a reading stamped with the current local time.
    pub fn generate(&mut self, sensor_id: &str) -> SensorReading {
        self.generate_at(sensor_id, Local::now())
    }

    /// Generate a reading stamped with the given instant.
    pub fn generate_at<Tz>(&mut self, sensor_id: &str, now: DateTime<Tz>) -> SensorReading
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        SensorReading {
            sensor_id: sensor_id.to_string(),
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
            pm25: PM25_RANGE.sample(self.source.next_unit()),
            pm10: PM10_RANGE.sample(self.source.next_unit()),
            co2: CO2_RANGE.sample(self.source.next_unit()),
            temperature: self.temperature(),
            pressure: PRESSURE_RANGE.sample(self.source.next_unit()),
            humidity: HUMIDITY_RANGE.sample(self.source.next_unit()),
        }
    }

    // Rounding can land exactly on the exclusive bound; step back one unit in that case.
    fn temperature(&mut self) -> f64 {
        let range = TEMPERATURE_RANGE;
        let raw = range.min + unit(self.source.next_unit()) * (range.max - range.min);
        let rounded = round_to(raw, TEMPERATURE_DECIMALS);
        if rounded >= range.max {
            round_to(range.max - 10f64.powi(-TEMPERATURE_DECIMALS), TEMPERATURE_DECIMALS)
        } else {
            rounded
        }
    }
}

/// Generate one reading using the thread-local RNG.
pub fn generate(sensor_id: &str) -> SensorReading {
    ReadingGenerator::with_thread_rng().generate(sensor_id)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Clamp a draw into `[0, 1)`.
fn unit(u: f64) -> f64 {
    if u.is_nan() || u < 0.0 {
        0.0
    } else if u >= 1.0 {
        1.0 - f64::EPSILON
    } else {
        u
    }
}
