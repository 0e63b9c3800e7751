use anyhow::{Context, Result, bail};
use std::collections::HashSet;

pub const DEFAULT_SEED: u64 = 1337;

/// Largest span a single `N..M` token may expand to.
const MAX_RANGE_SPAN: u64 = 10_000;

/// Resolve CLI seed tokens into recommendation seeds.
///
/// Supports decimal integers (negative values use their magnitude), `0x`
/// hexadecimal, and inclusive `N..M` ranges. Duplicates are dropped keeping
/// first appearance; an empty list falls back to [`DEFAULT_SEED`].
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut pending: Vec<u64> = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            pending.extend(parse_range(start, end)?);
            continue;
        }

        pending.push(parse_seed(token)?);
    }

    let mut seen = HashSet::new();
    let mut deduped: Vec<u64> = pending.into_iter().filter(|seed| seen.insert(*seed)).collect();

    if deduped.is_empty() {
        deduped.push(DEFAULT_SEED);
    }

    Ok(deduped)
}

fn parse_seed(token: &str) -> Result<u64> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .with_context(|| format!("invalid hexadecimal seed: {token}"));
    }

    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }

    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }

    bail!("Unrecognized seed token: {token}");
}

fn parse_range(start: &str, end: &str) -> Result<Vec<u64>> {
    let start = parse_seed(start.trim()).context("parsing range start")?;
    let end = parse_seed(end.trim()).context("parsing range end")?;
    if end < start {
        bail!("Seed range {start}..{end} is reversed");
    }
    if end - start >= MAX_RANGE_SPAN {
        bail!("Seed range {start}..{end} spans more than {MAX_RANGE_SPAN} seeds");
    }
    Ok((start..=end).collect())
}
