//! Fixed-width time string rendering.
//!
//! Renders an epoch second count into caller-provided byte buffers, as UTC.
//! The buffers are sized for C interop: each format's minimum size includes
//! one byte for a NUL terminator, which is written so the same buffer can be
//! handed to C APIs unchanged. The returned `&str` excludes the terminator.

use crate::error::{Error, Result};

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MIN: u64 = 60;

/// Rendering layout for [`format_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStringFormat {
    /// `HH:MM:SS`
    Time,
    /// `DD.MM.YYYY`
    Date,
    /// `HH:MM:SS DD.MM.YYYY`
    TimeDate,
    /// `YYYYMMDD_HHMMSS`, lexicographic order equals chronological order.
    SortedDateTime,
}

impl TimeStringFormat {
    /// Minimum buffer size for this layout, NUL terminator included.
    #[must_use]
    pub const fn min_buffer_size(self) -> usize {
        match self {
            Self::Time => 9,
            Self::Date => 11,
            Self::TimeDate => 20,
            Self::SortedDateTime => 16,
        }
    }
}

/// Renders `epoch_secs` (seconds since the Unix epoch, UTC) into `buf`.
///
/// Returns the rendered string, borrowed from `buf`.
///
/// # Errors
///
/// [`Error::InvalidArgument`] when `buf` is smaller than the layout's
/// [`min_buffer_size`](TimeStringFormat::min_buffer_size).
pub fn format_time(
    epoch_secs: u64,
    format: TimeStringFormat,
    buf: &mut [u8],
) -> Result<&str> {
    if buf.len() < format.min_buffer_size() {
        return Err(Error::InvalidArgument);
    }

    let secs_of_day = epoch_secs % SECS_PER_DAY;
    let hour = secs_of_day / SECS_PER_HOUR;
    let minute = (secs_of_day % SECS_PER_HOUR) / SECS_PER_MIN;
    let second = secs_of_day % SECS_PER_MIN;
    let (year, month, day) = civil_from_days(epoch_secs / SECS_PER_DAY);

    let rendered = match format {
        TimeStringFormat::Time => {
            format!("{hour:02}:{minute:02}:{second:02}")
        }
        TimeStringFormat::Date => {
            format!("{day:02}.{month:02}.{year:04}")
        }
        TimeStringFormat::TimeDate => {
            format!("{hour:02}:{minute:02}:{second:02} {day:02}.{month:02}.{year:04}")
        }
        TimeStringFormat::SortedDateTime => {
            format!("{year:04}{month:02}{day:02}_{hour:02}{minute:02}{second:02}")
        }
    };

    let bytes = rendered.as_bytes();
    // Years beyond four digits widen the rendering past the layout minimum.
    if buf.len() <= bytes.len() {
        return Err(Error::InvalidArgument);
    }
    buf[..bytes.len()].copy_from_slice(bytes);
    buf[bytes.len()] = 0;
    std::str::from_utf8(&buf[..bytes.len()]).map_err(|_| Error::InvalidArgument)
}

/// Proleptic Gregorian date for a day count since the Unix epoch.
///
/// Plain civil-from-days integer arithmetic; exact for the whole `u64`
/// second range used here.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-11-14 22:13:20 UTC
    const SAMPLE: u64 = 1_700_000_000;

    fn render(epoch: u64, format: TimeStringFormat) -> String {
        let mut buf = [0_u8; 32];
        format_time(epoch, format, &mut buf).unwrap().to_owned()
    }

    #[test]
    fn renders_each_layout() {
        assert_eq!(render(SAMPLE, TimeStringFormat::Time), "22:13:20");
        assert_eq!(render(SAMPLE, TimeStringFormat::Date), "14.11.2023");
        assert_eq!(
            render(SAMPLE, TimeStringFormat::TimeDate),
            "22:13:20 14.11.2023"
        );
        assert_eq!(
            render(SAMPLE, TimeStringFormat::SortedDateTime),
            "20231114_221320"
        );
    }

    #[test]
    fn epoch_zero_is_the_unix_epoch() {
        assert_eq!(render(0, TimeStringFormat::Time), "00:00:00");
        assert_eq!(render(0, TimeStringFormat::Date), "01.01.1970");
    }

    #[test]
    fn leap_day_is_rendered() {
        // 2020-02-29 12:00:00 UTC
        assert_eq!(render(1_582_977_600, TimeStringFormat::Date), "29.02.2020");
    }

    #[test]
    fn widths_match_the_layout_minimums() {
        for format in [
            TimeStringFormat::Time,
            TimeStringFormat::Date,
            TimeStringFormat::TimeDate,
            TimeStringFormat::SortedDateTime,
        ] {
            let rendered = render(SAMPLE, format);
            assert_eq!(rendered.len() + 1, format.min_buffer_size());
        }
    }

    #[test]
    fn exact_minimum_buffer_is_accepted() {
        let mut buf = [0_u8; 9];
        let rendered = format_time(SAMPLE, TimeStringFormat::Time, &mut buf).unwrap();
        assert_eq!(rendered, "22:13:20");
        assert_eq!(buf[8], 0);
    }

    #[test]
    fn undersized_buffer_is_rejected() {
        let mut buf = [0_u8; 8];
        assert_eq!(
            format_time(SAMPLE, TimeStringFormat::Time, &mut buf),
            Err(Error::InvalidArgument)
        );
        let mut buf = [0_u8; 15];
        assert_eq!(
            format_time(SAMPLE, TimeStringFormat::SortedDateTime, &mut buf),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn sorted_layout_sorts_chronologically() {
        let earlier = render(SAMPLE, TimeStringFormat::SortedDateTime);
        let later = render(SAMPLE + 86_400, TimeStringFormat::SortedDateTime);
        assert!(earlier < later);
    }
}
