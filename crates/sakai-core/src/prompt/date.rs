//! French date notice appended to every system instruction.

use chrono::{Datelike, NaiveDate};

/// Lowercase phrases that count as the instruction already stating today's date.
const DATE_MENTIONS: [&str; 2] = ["la date actuelle est", "nous sommes le"];

const WEEKDAYS: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

const MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Long French form of a date, e.g. `lundi 19 octobre 2026`.
pub fn format_french_date(date: NaiveDate) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    let month = MONTHS[date.month0() as usize];
    let day = match date.day() {
        1 => "1er".to_string(),
        d => d.to_string(),
    };
    format!("{weekday} {day} {month} {}", date.year())
}

/// Sentence announcing the current date.
pub fn date_notice(date: NaiveDate) -> String {
    format!("La date actuelle est {}.", format_french_date(date))
}

/// Whether `text` already tells the model what day it is.
pub fn mentions_current_date(text: &str) -> bool {
    let lower = text.to_lowercase();
    DATE_MENTIONS.iter().any(|phrase| lower.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_french_date() {
        assert_eq!(format_french_date(date(2026, 10, 19)), "lundi 19 octobre 2026");
        assert_eq!(format_french_date(date(2026, 8, 16)), "dimanche 16 août 2026");
    }

    #[test]
    fn test_first_day_of_month() {
        assert_eq!(format_french_date(date(2026, 1, 1)), "jeudi 1er janvier 2026");
    }

    #[test]
    fn test_date_notice() {
        assert_eq!(
            date_notice(date(2026, 10, 19)),
            "La date actuelle est lundi 19 octobre 2026."
        );
    }

    #[test]
    fn test_mentions_current_date_is_case_insensitive() {
        assert!(mentions_current_date("LA DATE ACTUELLE EST demain"));
        assert!(mentions_current_date("Pour info, nous sommes le 3 mai."));
        assert!(!mentions_current_date("Tu es un pirate."));
    }
}
