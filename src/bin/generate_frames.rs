use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

/// Write a synthetic frame family: a Gaussian blob drifting across the grid.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output directory
    #[arg(default_value = "sample_frames")]
    out: PathBuf,

    #[arg(short, long, default_value = "t_")]
    prefix: String,

    #[arg(short = 'n', long, default_value_t = 50)]
    frames: usize,

    #[arg(long, default_value_t = 64)]
    rows: usize,

    #[arg(long, default_value_t = 64)]
    cols: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

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
}

/// One frame as tab-separated text, blob centred at (`cy`, `cx`).
fn frame_text(
    rows: usize,
    cols: usize,
    cy: f64,
    cx: f64,
    rng: &mut SimpleRng,
) -> Result<String, std::fmt::Error> {
    let sigma = rows.min(cols) as f64 / 8.0;
    let mut text = String::with_capacity(rows * cols * 8);
    for r in 0..rows {
        for c in 0..cols {
            let v = gaussian(r as f64, cy, sigma, 1.0) * gaussian(c as f64, cx, sigma, 1.0)
                + rng.gauss(0.0, 0.02);
            if c > 0 {
                text.push('\t');
            }
            write!(text, "{v:.5}")?;
        }
        text.push('\n');
    }
    Ok(text)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    for i in 0..args.frames {
        // Diagonal sweep from top-left to bottom-right
        let t = if args.frames > 1 {
            i as f64 / (args.frames - 1) as f64
        } else {
            0.5
        };
        let cy = t * (args.rows.saturating_sub(1)) as f64;
        let cx = t * (args.cols.saturating_sub(1)) as f64;

        let path = args.out.join(format!("{}{i}.txt", args.prefix));
        let text = frame_text(args.rows, args.cols, cy, cx, &mut rng)
            .with_context(|| format!("formatting frame {i}"))?;
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    }

    info!("generated {} frames", args.frames);
    println!(
        "Wrote {} frames ({}×{}) to {}",
        args.frames,
        args.rows,
        args.cols,
        args.out.display()
    );
    Ok(())
}
