use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub const NOT_AVAILABLE: &str = "N/A";

/// 05 Jan 2025, 10:00 AM
const DATE_TIME: &[BorrowedFormatItem<'_>] = format_description!(
    "[day] [month repr:short] [year], [hour repr:12]:[minute] [period case:upper]"
);

/// 1/5/2025
const DATE: &[BorrowedFormatItem<'_>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

pub fn date_time(value: Option<OffsetDateTime>, offset: UtcOffset) -> String {
    render(value, offset, DATE_TIME)
}

pub fn date(value: Option<OffsetDateTime>, offset: UtcOffset) -> String {
    render(value, offset, DATE)
}

pub fn or_not_available(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn render(
    value: Option<OffsetDateTime>,
    offset: UtcOffset,
    format: &[BorrowedFormatItem<'_>],
) -> String {
    value
        .and_then(|it| it.to_offset(offset).format(format).ok())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod test {
    use time::{macros::datetime, UtcOffset};

    #[test]
    fn date_time() {
        assert_eq!(
            "05 Jan 2025, 10:00 AM",
            super::date_time(Some(datetime!(2025-01-05 10:00 UTC)), UtcOffset::UTC)
        );
        assert_eq!(
            "14 Nov 2025, 02:30 PM",
            super::date_time(Some(datetime!(2025-11-14 14:30 UTC)), UtcOffset::UTC)
        );
        assert_eq!(
            "01 Jan 2025, 12:05 AM",
            super::date_time(Some(datetime!(2025-01-01 0:05 UTC)), UtcOffset::UTC)
        );
        assert_eq!("N/A", super::date_time(None, UtcOffset::UTC));
    }

    #[test]
    fn date_time_in_local_offset() {
        let pkt = UtcOffset::from_hms(5, 0, 0).unwrap();
        assert_eq!(
            "05 Jan 2025, 03:00 PM",
            super::date_time(Some(datetime!(2025-01-05 10:00 UTC)), pkt)
        );
    }

    #[test]
    fn date() {
        assert_eq!(
            "1/31/2025",
            super::date(Some(datetime!(2025-01-31 0:00 UTC)), UtcOffset::UTC)
        );
        assert_eq!("N/A", super::date(None, UtcOffset::UTC));
    }

    #[test]
    fn or_not_available() {
        assert_eq!("N/A", super::or_not_available(None));
        assert_eq!("LHR-12", super::or_not_available(Some("LHR-12")));
    }
}
