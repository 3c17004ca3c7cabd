use anyhow::{Context, Result};

/// SplitMix64: small, seedable and reproducible across platforms.
struct Jitter(u64);

impl Jitter {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)` from the top 53 bits.
    fn unit(&mut self) -> f64 {
        (self.next() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// `center` moved by at most `spread` in either direction.
    fn around(&mut self, center: f64, spread: f64) -> f64 {
        center + (self.unit() * 2.0 - 1.0) * spread
    }
}

fn main() -> Result<()> {
    let mut rng = Jitter(42);

    // (city, latitude, longitude)
    let centers = [
        ("Jakarta", -6.2088, 106.8456),
        ("Bandung", -6.9175, 107.6191),
        ("Surabaya", -7.2575, 112.7521),
        ("Yogyakarta", -7.7956, 110.3695),
    ];
    let stations_per_city = 12;

    let output_path = "sample_points.csv";
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(output_path)
        .context("creating output file")?;

    // Mixed-case headers on purpose; the converter matches them case-insensitively.
    writer.write_record(["Name", "Latitude", "Longitude", "Elevation"])?;

    let mut written = 0;
    for (city, lat, lon) in centers {
        for i in 0..stations_per_city {
            let name = format!("{city} {:02}", i + 1);
            let lat = rng.around(lat, 0.08);
            let lon = rng.around(lon, 0.08);
            let elevation = rng.around(120.0, 100.0);
            writer.write_record([
                name,
                format!("{lat:.6}"),
                format!("{lon:.6}"),
                format!("{elevation:.1}"),
            ])?;
            written += 1;
        }
    }

    // Rows the converter is expected to skip.
    writer.write_record(["Broken latitude", "n/a", "106.8", "0"])?;
    writer.write_record(["Missing longitude", "-6.2", "", "0"])?;
    writer.write_record(["Infinite", "inf", "107.0", "0"])?;
    writer.flush().context("writing output file")?;

    println!("Wrote {written} valid and 3 malformed rows to {output_path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_sequence() {
        let (mut a, mut b) = (Jitter(7), Jitter(7));
        for _ in 0..100 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn jitter_stays_within_spread() {
        let mut rng = Jitter(42);
        for _ in 0..1000 {
            let v = rng.around(-6.2, 0.08);
            assert!((v + 6.2).abs() <= 0.08 + 1e-12, "{v}");
        }
    }
}
