//! Writes a deterministic demo table for the dashboard.
//!
//! Usage: `generate_sample [OUT]` (default `sample_data.csv`).

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Returns an empty cell with probability `p`.
    fn maybe_missing(&mut self, p: f64, value: String) -> String {
        if self.next_f64() < p {
            String::new()
        } else {
            value
        }
    }
}

const ROWS: usize = 500;

fn main() {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_data.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let cities = ["Berlin", "Lisbon", "Oslo", "Madrid", "Prague"];
    let segments = ["consumer", "business", "enterprise"];
    let channels = ["web", "referral", "store"];

    let mut writer = csv::Writer::from_path(&output_path).expect("Failed to create output file");
    writer
        .write_record([
            "customer_id",
            "age",
            "income",
            "visits",
            "spend",
            "city",
            "segment",
            "channel",
        ])
        .expect("Failed to write header");

    for id in 0..ROWS {
        let age = rng.gauss(41.0, 12.0).clamp(18.0, 90.0).round();
        let income = (rng.gauss(52_000.0, 18_000.0) + age * 400.0).max(8_000.0);
        let visits = (rng.gauss(12.0, 5.0).max(0.0)).round();
        // Spend follows visits and income so the heatmap has some structure.
        let spend = visits * 35.0 + income * 0.01 + rng.gauss(0.0, 60.0);
        let channel = rng.pick(&channels).to_string();

        let record = [
            id.to_string(),
            rng.maybe_missing(0.03, format!("{age}")),
            rng.maybe_missing(0.08, format!("{income:.2}")),
            format!("{visits}"),
            rng.maybe_missing(0.05, format!("{spend:.2}")),
            rng.pick(&cities).to_string(),
            rng.pick(&segments).to_string(),
            rng.maybe_missing(0.1, channel),
        ];
        writer.write_record(&record).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {ROWS} rows to {output_path}");
}
