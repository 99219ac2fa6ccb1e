//! # Display Stamps
//!
//! Human-readable texts captured when a session opens.
//!
//! A session stores two strings next to its opening instant:
//!
//! | Field           | pt_BR example              | en_US example        |
//! |-----------------|----------------------------|----------------------|
//! | `timestampText` | `Hoje às 08:15`            | `Today at 8:15 AM`   |
//! | `dateToShow`    | `19 de outubro de 2026`    | `October 19, 2026`   |
//!
//! They are rendered once, at open time, and never recomputed.

use chrono::{DateTime, FixedOffset, Local, Locale, Offset, Utc};

/// The opening instant plus its rendered texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayStamp {
    pub opened_at: DateTime<Utc>,
    pub timestamp_text: String,
    pub date_to_show: String,
}

impl DisplayStamp {
    /// A stamp with locale-independent texts (UTC `HH:MM`, ISO date).
    pub fn plain(at: DateTime<Utc>) -> Self {
        DisplayStamp {
            opened_at: at,
            timestamp_text: at.format("%H:%M").to_string(),
            date_to_show: at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Renders display stamps. Injected into the lifecycle controller so tests
/// can pin the clock and the locale.
pub trait DisplayFormatter: Send + Sync {
    fn stamp(&self, at: DateTime<Utc>) -> DisplayStamp;

    /// Stamp for the current instant.
    fn now(&self) -> DisplayStamp {
        self.stamp(Utc::now())
    }
}

/// Formats stamps with chrono's localized month names.
#[derive(Debug, Clone)]
pub struct LocalizedFormatter {
    locale: Locale,
    offset: FixedOffset,
}

impl LocalizedFormatter {
    pub fn new(locale: Locale, offset: FixedOffset) -> Self {
        LocalizedFormatter { locale, offset }
    }

    /// Uses the machine's current UTC offset.
    pub fn with_local_offset(locale: Locale) -> Self {
        LocalizedFormatter::new(locale, Local::now().offset().fix())
    }

    fn is_portuguese(&self) -> bool {
        matches!(self.locale, Locale::pt_BR | Locale::pt_PT)
    }
}

impl Default for LocalizedFormatter {
    fn default() -> Self {
        LocalizedFormatter::with_local_offset(Locale::pt_BR)
    }
}

impl DisplayFormatter for LocalizedFormatter {
    fn stamp(&self, at: DateTime<Utc>) -> DisplayStamp {
        let local = at.with_timezone(&self.offset);

        let (timestamp_text, date_to_show) = match self.locale {
            Locale::pt_BR | Locale::pt_PT | Locale::es_ES => {
                let prefix = if self.is_portuguese() { "Hoje às" } else { "Hoy a las" };
                (
                    format!("{} {}", prefix, local.format("%H:%M")),
                    local
                        .format_localized("%-d de %B de %Y", self.locale)
                        .to_string(),
                )
            }
            _ => (
                format!("Today at {}", local.format("%-I:%M %p")),
                local.format_localized("%B %-d, %Y", self.locale).to_string(),
            ),
        };

        DisplayStamp {
            opened_at: at,
            timestamp_text,
            date_to_show,
        }
    }
}

/// Parses a locale name from configuration (`pt_BR`, `pt-BR`, `en_US`, ...).
pub fn parse_locale(name: &str) -> Option<Locale> {
    match name.trim().replace('-', "_").as_str() {
        "pt_BR" | "pt_br" => Some(Locale::pt_BR),
        "pt_PT" | "pt_pt" => Some(Locale::pt_PT),
        "en_US" | "en_us" => Some(Locale::en_US),
        "es_ES" | "es_es" => Some(Locale::es_ES),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 11, 15, 0).unwrap()
    }

    fn brasilia() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    #[test]
    fn test_pt_br_stamp() {
        let formatter = LocalizedFormatter::new(Locale::pt_BR, brasilia());
        let stamp = formatter.stamp(instant());

        assert_eq!(stamp.timestamp_text, "Hoje às 08:15");
        assert_eq!(stamp.date_to_show, "19 de outubro de 2026");
        assert_eq!(stamp.opened_at, instant());
    }

    #[test]
    fn test_en_us_stamp() {
        let formatter = LocalizedFormatter::new(Locale::en_US, brasilia());
        let stamp = formatter.stamp(instant());

        assert_eq!(stamp.timestamp_text, "Today at 8:15 AM");
        assert_eq!(stamp.date_to_show, "October 19, 2026");
    }

    #[test]
    fn test_offset_can_change_the_day() {
        let formatter = LocalizedFormatter::new(Locale::pt_BR, brasilia());
        let late = Utc.with_ymd_and_hms(2026, 10, 20, 1, 0, 0).unwrap();
        assert_eq!(formatter.stamp(late).date_to_show, "19 de outubro de 2026");
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(parse_locale("pt_BR"), Some(Locale::pt_BR));
        assert_eq!(parse_locale("pt-BR"), Some(Locale::pt_BR));
        assert_eq!(parse_locale(" en_US "), Some(Locale::en_US));
        assert_eq!(parse_locale("xx_YY"), None);
    }

    #[test]
    fn test_plain_stamp() {
        let stamp = DisplayStamp::plain(instant());
        assert_eq!(stamp.timestamp_text, "11:15");
        assert_eq!(stamp.date_to_show, "2026-10-19");
    }
}
