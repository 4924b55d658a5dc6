use anyhow::{Context, Result};

const HEADER: [&str; 15] = [
    "ID",
    "Subcommittee",
    "Decision",
    "ReviewsTotal",
    "ReviewsDone",
    "ReviewsLeft",
    "ReviewsTentative",
    "OverallScore",
    "OverallStdDev",
    "Pname",
    "Pscore",
    "S1name",
    "S1score",
    "E1score",
    "E2score",
];

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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// A review score on the usual 1–5 scale, or an empty cell.
    fn score(&mut self, p_missing: f64) -> String {
        if self.chance(p_missing) {
            String::new()
        } else {
            format!("{:.1}", 1.0 + self.next_f64() * 4.0)
        }
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let subcommittees = ["Split A", "Split B", "Split C"];
    let decisions = ["ACCEPT", "REJECT"];
    let reviewers = ["Ada", "Alan", "Barbara", "Donald", "Edsger", "Grace"];

    let output_path = "Submissions.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(HEADER)?;

    let rows = 120;
    for id in 1000..1000 + rows {
        let subcommittee = subcommittees[rng.below(subcommittees.len() as u64) as usize];
        let decision = if rng.chance(0.3) {
            decisions[rng.below(decisions.len() as u64) as usize]
        } else {
            ""
        };

        let total = rng.below(5);
        let done = if total == 0 { 0 } else { rng.below(total + 1) };
        let left = total - done;
        let tentative = rng.below(left + 1);

        let primary = if total == 0 || rng.chance(0.05) {
            ""
        } else {
            reviewers[rng.below(reviewers.len() as u64) as usize]
        };
        let secondary = reviewers[rng.below(reviewers.len() as u64) as usize];

        let (overall, std_dev) = if done == 0 {
            (String::new(), String::new())
        } else {
            (rng.score(0.0), format!("{:.2}", rng.next_f64()))
        };

        writer.write_record([
            id.to_string(),
            subcommittee.to_string(),
            decision.to_string(),
            total.to_string(),
            done.to_string(),
            left.to_string(),
            tentative.to_string(),
            overall,
            std_dev,
            primary.to_string(),
            rng.score(0.4),
            secondary.to_string(),
            rng.score(0.5),
            rng.score(0.3),
            rng.score(0.3),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {rows} submissions to {output_path}");
    Ok(())
}
