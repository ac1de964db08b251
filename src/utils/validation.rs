use crate::utils::error::{CheckError, Result};
use std::time::Duration;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(CheckError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(CheckError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CheckError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_duration(field_name: &str, value: Duration) -> Result<()> {
    if value.is_zero() {
        return Err(CheckError::InvalidConfigValue {
            field: field_name.to_string(),
            value: format!("{:?}", value),
            reason: "Duration must be greater than zero".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty<T>(field_name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(CheckError::InvalidConfigValue {
            field: field_name.to_string(),
            value: "[]".to_string(),
            reason: "At least one value is required".to_string(),
        });
    }
    Ok(())
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// 解析 `500ms`、`5s`、`1m30s`、`1.5h` 或純秒數
pub fn parse_duration(input: &str) -> std::result::Result<Duration, String> {
    let input = input.trim();
    let invalid = || format!("invalid duration '{}'", input);

    if input.is_empty() {
        return Err(invalid());
    }
    // 純數字視為秒
    if input.bytes().all(|b| b.is_ascii_digit()) {
        return input.parse().map(Duration::from_secs).map_err(|_| invalid());
    }

    let mut total_nanos: u128 = 0;
    let mut rest = input;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);

        let unit_nanos: u128 = match unit {
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3600 * NANOS_PER_SEC,
            "" => return Err(format!("missing unit after '{}' in '{}'", number, input)),
            other => {
                return Err(format!(
                    "unknown duration unit '{}' in '{}' (use ms, s, m or h)",
                    other, input
                ))
            }
        };

        let part = scaled_nanos(number, unit_nanos).ok_or_else(invalid)?;
        total_nanos = total_nanos.checked_add(part).ok_or_else(invalid)?;
        rest = next;
    }

    let secs = u64::try_from(total_nanos / NANOS_PER_SEC).map_err(|_| invalid())?;
    Ok(Duration::new(secs, (total_nanos % NANOS_PER_SEC) as u32))
}

// `<whole>[.<frac>]` 換算成奈秒，超出奈秒精度的小數位捨去
fn scaled_nanos(number: &str, unit_nanos: u128) -> Option<u128> {
    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse::<u64>().ok()?.into()
    };
    let frac = &frac[..frac.len().min(18)];
    let frac_value: u128 = if frac.is_empty() { 0 } else { frac.parse().ok()? };
    let frac_scale = 10u128.pow(frac.len() as u32);

    whole
        .checked_mul(unit_nanos)?
        .checked_add(frac_value * unit_nanos / frac_scale)
}
