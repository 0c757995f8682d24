use anyhow::{Result, bail};
use wayfarer_game::{ALL_CYCLES, Cycle};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse seed tokens. Negative literals fold to their magnitude; duplicates
/// are dropped and an empty list falls back to the default seed.
pub fn resolve_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();
    for token in tokens {
        let seed = if let Ok(value) = token.parse::<u64>() {
            value
        } else if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else if let Some(hex) = token.strip_prefix("0x")
            && let Ok(value) = u64::from_str_radix(hex, 16)
        {
            value
        } else {
            bail!("Unrecognized seed token: {token}");
        };
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        seeds.push(1337);
    }
    Ok(seeds)
}

/// Parse cycle ids; `all` expands to every shipped cycle.
pub fn resolve_cycles(tokens: &[String]) -> Result<Vec<Cycle>> {
    let mut cycles = Vec::new();
    for token in tokens {
        if token.eq_ignore_ascii_case("all") {
            for cycle in ALL_CYCLES {
                if !cycles.contains(&cycle) {
                    cycles.push(cycle);
                }
            }
            continue;
        }
        let Some(cycle) = Cycle::from_id(token) else {
            bail!("Unknown cycle: {token}");
        };
        if !cycles.contains(&cycle) {
            cycles.push(cycle);
        }
    }
    if cycles.is_empty() {
        cycles.push(Cycle::Core);
    }
    Ok(cycles)
}
