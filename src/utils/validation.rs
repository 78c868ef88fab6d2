use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest weakness title the `users` table is meant to hold.
pub const WEAKNESS_TITLE_MAX: usize = 256;

#[allow(clippy::expect_used)]
static START_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$").expect("compile start date regex")
});

/// Bot commands are never accepted as free-text answers.
pub fn is_command(text: &str) -> bool {
    text.starts_with('/')
}

/// Whether the text has the `DD/MM/YYYY` shape. Text without this shape is
/// not treated as an answer to the date question at all.
pub fn is_date_shaped(text: &str) -> bool {
    START_DATE_REGEX.is_match(text)
}

pub fn validate_weakness_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(anyhow!("Weakness title cannot be empty"));
    }

    if title.chars().count() > WEAKNESS_TITLE_MAX {
        return Err(anyhow!(
            "Weakness title cannot be longer than {WEAKNESS_TITLE_MAX} characters"
        ));
    }

    Ok(())
}

/// Parses a `DD/MM/YYYY` start date. The date has to exist on the calendar
/// and must not lie after `today`.
pub fn parse_start_date(text: &str, today: NaiveDate) -> Result<NaiveDate> {
    if !is_date_shaped(text) {
        return Err(anyhow!("Start date must look like DD/MM/YYYY"));
    }

    let date = NaiveDate::parse_from_str(text, "%d/%m/%Y")
        .map_err(|_| anyhow!("{text} is not a valid calendar date"))?;

    if date > today {
        return Err(anyhow!("Start date cannot be in the future"));
    }

    Ok(date)
}
