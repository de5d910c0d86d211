use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use route_pyramid::data::grades::{band_index, GradeScale};
use route_pyramid::data::model::{LeadStyle, RouteType};

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

struct Route {
    name: String,
    url: String,
    location: &'static str,
    route_type: RouteType,
    rating_code: u32,
    pitches: u32,
}

const CRAGS: [&str; 4] = ["Smith Rock", "Red River Gorge", "Index", "Tieton"];
const WORDS: [&str; 10] = [
    "Crimson", "Dihedral", "Chimney", "Arete", "Roof", "Slab", "Crack", "Pillar", "Flake", "Ledge",
];

/// Ratings skew easy, like most climbers' logs.
fn random_rating(rng: &mut SimpleRng) -> u32 {
    let t = rng.next_f64().powf(1.8);
    1000 + (t * 8000.0) as u32
}

fn make_routes(rng: &mut SimpleRng, count: usize) -> Vec<Route> {
    (0..count)
        .map(|i| {
            let route_type = match rng.below(10) {
                0..=5 => RouteType::Sport,
                6..=8 => RouteType::Trad,
                _ => RouteType::TopRope,
            };
            let pitches = if route_type == RouteType::Trad && rng.chance(0.3) {
                2 + rng.below(8) as u32
            } else {
                1
            };
            let name = format!(
                "{} {}",
                WORDS[rng.below(WORDS.len())],
                WORDS[rng.below(WORDS.len())]
            );
            Route {
                name,
                url: format!("https://www.mountainproject.com/route/{}", 105_700_000 + i),
                location: CRAGS[rng.below(CRAGS.len())],
                route_type,
                rating_code: random_rating(rng),
                pitches,
            }
        })
        .collect()
}

fn random_style(rng: &mut SimpleRng, route: &Route) -> Option<LeadStyle> {
    if route.route_type == RouteType::TopRope || rng.chance(0.1) {
        return None;
    }
    Some(LeadStyle::ALL[rng.below(LeadStyle::ALL.len())])
}

fn main() -> Result<()> {
    env_logger::init();

    let out = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ticks.csv"));

    let mut rng = SimpleRng::new(42);
    let routes = make_routes(&mut rng, 180);
    let bands = GradeScale::Standard.table().bands();
    let first_day = NaiveDate::from_ymd_opt(2018, 3, 1).context("invalid start date")?;

    let mut writer = csv::Writer::from_path(&out)
        .with_context(|| format!("creating {}", out.display()))?;
    writer.write_record([
        "Date",
        "Route",
        "Rating",
        "Notes",
        "URL",
        "Pitches",
        "Location",
        "Style",
        "Lead Style",
        "Route Type",
        "Rating Code",
    ])?;

    let mut written = 0usize;
    for _ in 0..600 {
        let route = &routes[rng.below(routes.len())];
        let date = first_day + Days::new(rng.below(365 * 7) as u64);
        let style = random_style(&mut rng, route);
        let grade = band_index(bands, route.rating_code)
            .map(|i| bands[i].label)
            .unwrap_or("5.14");
        let date_text = if rng.chance(0.02) {
            String::new()
        } else {
            date.format("%Y-%m-%d").to_string()
        };

        writer.write_record([
            date_text.as_str(),
            route.name.as_str(),
            grade,
            "",
            route.url.as_str(),
            route.pitches.to_string().as_str(),
            route.location,
            if route.route_type == RouteType::TopRope { "TR" } else { "Lead" },
            style.map(|s| s.label()).unwrap_or(""),
            route.route_type.label(),
            route.rating_code.to_string().as_str(),
        ])?;
        written += 1;
    }
    writer.flush()?;

    log::info!("Wrote {written} ticks for {} routes", routes.len());
    println!("Wrote {written} ticks to {}", out.display());
    Ok(())
}
