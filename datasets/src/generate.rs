//! Utility functions for randomly generating flight history

use rand::Rng;

use crate::CARRIERS;

/// Features of a single generated flight, without carrier and year
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flight {
    pub quarter: i64,
    pub month: i64,
    pub week_of_month: i64,
    pub day_of_week: i64,
    pub popular_origin: i64,
    pub popular_destination: i64,
    pub departure_bin: i64,
    pub arrival_bin: i64,
    pub scheduled_elapsed_time: i64,
    pub distance: i64,
}

impl Flight {
    /// Draws a random flight
    pub fn random(rng: &mut impl Rng) -> Self {
        let month = rng.gen_range(1..=12);
        let scheduled_elapsed_time = rng.gen_range(40..=420);

        Flight {
            quarter: (month - 1) / 3 + 1,
            month,
            week_of_month: rng.gen_range(1..=31) / 7,
            day_of_week: rng.gen_range(1..=7),
            popular_origin: rng.gen_bool(0.6) as i64,
            popular_destination: rng.gen_bool(0.6) as i64,
            departure_bin: rng.gen_range(0..=3),
            arrival_bin: rng.gen_range(0..=3),
            scheduled_elapsed_time,
            distance: scheduled_elapsed_time * 7 + rng.gen_range(-50..=50),
        }
    }

    /// Ground truth delay label of the flight
    ///
    /// Late departures out of busy airports are delayed, as are long flights in the winter
    /// quarter.
    pub fn delayed(&self) -> bool {
        (self.departure_bin >= 2 && self.popular_origin == 1)
            || (self.quarter == 1 && self.scheduled_elapsed_time > 240)
    }

    fn fields(&self) -> [i64; 10] {
        [
            self.quarter,
            self.month,
            self.week_of_month,
            self.day_of_week,
            self.popular_origin,
            self.popular_destination,
            self.departure_bin,
            self.arrival_bin,
            self.scheduled_elapsed_time,
            self.distance,
        ]
    }
}

/// Formats a flight as a raw tab separated record
pub fn to_record(carrier: &str, year: i64, flight: &Flight, label: bool) -> String {
    let mut fields = vec![carrier.to_string(), year.to_string()];
    fields.extend(flight.fields().iter().map(|x| x.to_string()));
    fields.push((label as u8).to_string());

    fields.join("\t")
}

/// Generates `n_records` raw flight history records
///
/// Every record carries the label given by [`Flight::delayed`], flipped with probability
/// `noise`.
pub fn flight_history(n_records: usize, noise: f64, rng: &mut impl Rng) -> Vec<String> {
    (0..n_records)
        .map(|_| {
            let carrier = CARRIERS[rng.gen_range(0..CARRIERS.len())];
            let year = rng.gen_range(2010..=2015);
            let flight = Flight::random(rng);
            let label = flight.delayed() ^ rng.gen_bool(noise);

            to_record(carrier, year, &flight, label)
        })
        .collect()
}
