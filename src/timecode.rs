/*!
 * Timecode parsing and formatting for SRT-style timestamps.
 *
 * All arithmetic is done in integer milliseconds so that
 * parse/format round-trips are exact at millisecond precision.
 */

use crate::errors::TimecodeError;

/// Parse an `HH:MM:SS,mmm` timecode to milliseconds.
///
/// Both comma and dot millisecond separators are accepted since
/// subtitle files in the wild use either. Malformed input yields a
/// recoverable error; callers typically fall back to 0 and continue.
pub fn parse_timecode(timecode: &str) -> Result<u64, TimecodeError> {
    let parts: Vec<&str> = timecode.trim().split(&[':', ',', '.'][..]).collect();

    if parts.len() != 4 {
        return Err(TimecodeError::Malformed(timecode.to_string()));
    }

    let hours: u64 = parts[0]
        .parse()
        .map_err(|_| TimecodeError::Malformed(timecode.to_string()))?;
    let minutes: u64 = parts[1]
        .parse()
        .map_err(|_| TimecodeError::Malformed(timecode.to_string()))?;
    let seconds: u64 = parts[2]
        .parse()
        .map_err(|_| TimecodeError::Malformed(timecode.to_string()))?;
    let millis: u64 = parts[3]
        .parse()
        .map_err(|_| TimecodeError::Malformed(timecode.to_string()))?;

    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return Err(TimecodeError::Malformed(timecode.to_string()));
    }

    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
}

/// Parse a timecode, defaulting to 0 ms on malformed input.
///
/// Used on paths where a bad timestamp must not abort processing of
/// the surrounding episode.
pub fn parse_timecode_or_zero(timecode: &str) -> u64 {
    match parse_timecode(timecode) {
        Ok(ms) => ms,
        Err(e) => {
            log::warn!("{}, defaulting to 00:00:00,000", e);
            0
        }
    }
}

/// Format milliseconds as an SRT timecode (`HH:MM:SS,mmm`).
///
/// Always emits the canonical comma separator with zero-padded fields.
pub fn format_timecode(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Convert milliseconds to fractional seconds.
pub fn ms_to_seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Convert fractional seconds to milliseconds, rounding to the nearest ms.
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0).round() as u64
}
