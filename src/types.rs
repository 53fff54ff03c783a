use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Cloud provider hosting the protected resources.
///
/// Only AWS is supported; the config still names it explicitly so an
/// unsupported value is rejected at load time instead of half-way through a
/// run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Aws,
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aws" => Ok(Provider::Aws),
            other => Err(format!("provider '{other}' is not supported (expected \"aws\")")),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Aws => f.write_str("aws"),
        }
    }
}

/// Kind of resource a `[[protect.resources]]` entry refers to.
///
/// `rds` covers Aurora / RDS DB clusters, which are snapshotted with
/// cluster snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Rds,
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rds" => Ok(ResourceKind::Rds),
            other => Err(format!(
                "resource type '{other}' is not supported (expected \"rds\")"
            )),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Rds => f.write_str("rds"),
        }
    }
}

/// Parse a duration such as `"30s"`, `"250ms"`, `"2m"` or `"1m30s"`.
///
/// A bare number is taken as seconds. Units are `ms`, `s`, `m` and `h`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let input = s.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(secs) = input.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("invalid duration '{input}': expected a number"));
        }
        let (number, tail) = rest.split_at(digits);
        let unit_len = tail
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);

        let value: u64 = number
            .parse()
            .map_err(|e| format!("invalid duration '{input}': {e}"))?;
        let part = match unit {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(3600)),
            "" => return Err(format!("invalid duration '{input}': missing unit")),
            other => {
                return Err(format!(
                    "invalid duration '{input}': unknown unit '{other}' (expected ms, s, m or h)"
                ));
            }
        };
        total = total.saturating_add(part);
        rest = next;
    }

    Ok(total)
}
