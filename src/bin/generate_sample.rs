use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use spacex_dash::data::model::{
    LaunchRecord, Outcome, COL_BOOSTER_CATEGORY, COL_CLASS, COL_LAUNCH_SITE, COL_PAYLOAD_MASS,
};

const CSV_PATH: &str = "sample_launches.csv";
const PARQUET_PATH: &str = "sample_launches.parquet";
const LAUNCHES: usize = 56;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[(self.next_u64() % choices.len() as u64) as usize]
    }
}

/// Booster generation flown at a given point of the launch history, with
/// its typical payload envelope (kg) and landing success rate.
struct Era {
    booster: &'static str,
    sites: &'static [&'static str],
    payload: (f64, f64),
    success_rate: f64,
}

static ERAS: [(usize, Era); 5] = [
    (
        5,
        Era {
            booster: "v1.0",
            sites: &["CCAFS LC-40"],
            payload: (0.0, 700.0),
            success_rate: 0.0,
        },
    ),
    (
        20,
        Era {
            booster: "v1.1",
            sites: &["CCAFS LC-40", "VAFB SLC-4E"],
            payload: (500.0, 4500.0),
            success_rate: 0.1,
        },
    ),
    (
        44,
        Era {
            booster: "FT",
            sites: &["CCAFS LC-40", "KSC LC-39A", "VAFB SLC-4E"],
            payload: (2000.0, 9600.0),
            success_rate: 0.7,
        },
    ),
    (
        50,
        Era {
            booster: "B4",
            sites: &["KSC LC-39A", "CCAFS SLC-40", "VAFB SLC-4E"],
            payload: (2200.0, 7000.0),
            success_rate: 0.6,
        },
    ),
    (
        LAUNCHES,
        Era {
            booster: "B5",
            sites: &["CCAFS SLC-40", "KSC LC-39A"],
            payload: (3000.0, 9600.0),
            success_rate: 0.9,
        },
    ),
];

fn era_for(flight: usize) -> &'static Era {
    ERAS.iter()
        .find(|(until, _)| flight < *until)
        .map_or(&ERAS[ERAS.len() - 1].1, |(_, era)| era)
}

fn generate(rng: &mut SimpleRng) -> Vec<LaunchRecord> {
    (0..LAUNCHES)
        .map(|flight| {
            let era = era_for(flight);
            let (lo, hi) = era.payload;
            let payload = (lo + rng.next_f64() * (hi - lo)).round();
            let outcome = if rng.next_f64() < era.success_rate {
                Outcome::Success
            } else {
                Outcome::Failure
            };
            LaunchRecord::new(rng.pick(era.sites), payload, era.booster, outcome)
        })
        .collect()
}

fn write_csv(records: &[LaunchRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV output")?;
    for rec in records {
        writer.serialize(rec).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn write_parquet(records: &[LaunchRecord]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
        Field::new(COL_PAYLOAD_MASS, DataType::Float64, false),
        Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
        Field::new(COL_CLASS, DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.launch_site.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(
                records.iter().map(|r| r.payload_mass_kg),
            )),
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.booster_version_category.as_str()),
            )),
            Arc::new(Int64Array::from_iter_values(
                records.iter().map(|r| i64::from(r.outcome.class())),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let records = generate(&mut rng);

    write_csv(&records)?;
    write_parquet(&records)?;

    let successes = records.iter().filter(|r| r.outcome.is_success()).count();
    log::info!("{successes} of {} generated launches succeeded", records.len());
    println!(
        "Wrote {} launches to {CSV_PATH} and {PARQUET_PATH}",
        records.len()
    );
    Ok(())
}
