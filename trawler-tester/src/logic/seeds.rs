use anyhow::{Context, Result, bail};
use trawler_core::FlagVariant;

/// Resolve CLI seed tokens. Negative literals are folded onto their magnitude.
pub fn resolve_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::with_capacity(tokens.len());
    for token in tokens {
        let seed = match token.parse::<u64>() {
            Ok(value) => value,
            Err(_) => match token.parse::<i64>() {
                Ok(value) => value.unsigned_abs(),
                Err(_) => bail!("seed `{token}` is not an integer"),
            },
        };
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        bail!("no seeds given");
    }
    Ok(seeds)
}

/// Resolve CLI flag tokens; `all` expands to every flag, including `Unknown`.
pub fn resolve_flags(tokens: &[String]) -> Result<Vec<FlagVariant>> {
    if tokens.iter().any(|token| token.eq_ignore_ascii_case("all")) {
        return Ok(FlagVariant::ALL.to_vec());
    }

    let mut flags = Vec::with_capacity(tokens.len());
    for token in tokens {
        let flag = token
            .parse::<FlagVariant>()
            .with_context(|| format!("resolving flag `{token}`"))?;
        if !flags.contains(&flag) {
            flags.push(flag);
        }
    }
    if flags.is_empty() {
        bail!("no flags given");
    }
    Ok(flags)
}
