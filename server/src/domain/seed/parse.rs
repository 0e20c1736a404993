//! Flat-file record parsing for the MovieLens seed files
//!
//! | File     | Delimiter | Fields                                            |
//! |----------|-----------|---------------------------------------------------|
//! | `u.user` | `\|`      | user_id, age, gender, occupation, zipcode         |
//! | `u.item` | `\|`      | movie_id, title, release date, video date, url... |
//! | `u.data` | tab       | user_id, movie_id, score, timestamp               |
//!
//! Every malformed line is fatal; callers get the file name and line number.

use std::borrow::Cow;
use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::core::constants::MAX_ZIPCODE_LEN;
use crate::data::types::{SeedMovie, SeedRating, SeedUser};
use crate::domain::error::RatingsError;

/// Release date format used by `u.item` (e.g. `01-Jan-1995`)
pub const RELEASE_DATE_FORMAT: &str = "%d-%b-%Y";

/// Length of the ` (YYYY)` suffix carried by every `u.item` title
const TITLE_YEAR_SUFFIX_LEN: usize = 7;

const USER_FIELDS: usize = 5;
const MOVIE_MIN_FIELDS: usize = 5;
const RATING_FIELDS: usize = 4;

/// Parse `u.user` content
pub fn parse_users<R: Read>(reader: R, file: &str) -> Result<Vec<SeedUser>, RatingsError> {
    parse_records(reader, b'|', file, |fields| {
        expect_exact(fields, USER_FIELDS)?;
        let zipcode = &fields[4];
        if zipcode.chars().count() > MAX_ZIPCODE_LEN {
            return Err(format!(
                "zipcode '{}' exceeds {} characters",
                zipcode, MAX_ZIPCODE_LEN
            ));
        }
        Ok(SeedUser {
            user_id: parse_number(&fields[0], "user_id")?,
            age: Some(parse_number(&fields[1], "age")?),
            zipcode: (!zipcode.is_empty()).then(|| zipcode.to_string()),
        })
    })
}

/// Parse `u.item` content; only the first five fields are used
pub fn parse_movies<R: Read>(reader: R, file: &str) -> Result<Vec<SeedMovie>, RatingsError> {
    parse_records(reader, b'|', file, |fields| {
        if fields.len() < MOVIE_MIN_FIELDS {
            return Err(format!(
                "expected at least {} fields, found {}",
                MOVIE_MIN_FIELDS,
                fields.len()
            ));
        }
        Ok(SeedMovie {
            movie_id: parse_number(&fields[0], "movie_id")?,
            title: strip_year_suffix(&fields[1]),
            released_at: parse_release_date(&fields[2])?,
            imdb_url: fields[4].to_string(),
        })
    })
}

/// Parse `u.data` content; the timestamp is discarded
pub fn parse_ratings<R: Read>(reader: R, file: &str) -> Result<Vec<SeedRating>, RatingsError> {
    parse_records(reader, b'\t', file, |fields| {
        expect_exact(fields, RATING_FIELDS)?;
        Ok(SeedRating {
            user_id: parse_number(&fields[0], "user_id")?,
            movie_id: parse_number(&fields[1], "movie_id")?,
            score: parse_number(&fields[2], "score")?,
        })
    })
}

/// Drop the trailing ` (YYYY)` by fixed-width truncation
pub fn strip_year_suffix(title: &str) -> String {
    let keep = title.chars().count().saturating_sub(TITLE_YEAR_SUFFIX_LEN);
    title.chars().take(keep).collect()
}

/// Parse a `u.item` release date; an empty field means unknown
pub fn parse_release_date(value: &str) -> Result<Option<NaiveDate>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, RELEASE_DATE_FORMAT)
        .map(Some)
        .map_err(|e| format!("invalid release date '{}': {}", value, e))
}

fn expect_exact(fields: &[Cow<'_, str>], expected: usize) -> Result<(), String> {
    if fields.len() != expected {
        return Err(format!(
            "expected {} fields, found {}",
            expected,
            fields.len()
        ));
    }
    Ok(())
}

fn parse_number<T: FromStr>(value: &str, name: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| format!("invalid {} '{}': {}", name, value, e))
}

/// Decode a field as UTF-8, falling back to Latin-1
fn decode_field(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Read delimited records and map each through `parse`
///
/// Quoting is disabled since titles contain bare `"` characters. Blank lines
/// are skipped and fields are trimmed.
fn parse_records<R, T, F>(
    reader: R,
    delimiter: u8,
    file: &str,
    parse: F,
) -> Result<Vec<T>, RatingsError>
where
    R: Read,
    F: Fn(&[Cow<'_, str>]) -> Result<T, String>,
{
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut record = csv::ByteRecord::new();
    loop {
        let more = csv.read_byte_record(&mut record).map_err(|e| {
            RatingsError::MalformedInput {
                file: file.to_string(),
                line: e.position().map(|p| p.line()).unwrap_or(0),
                reason: e.to_string(),
            }
        })?;
        if !more {
            break;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        let fields: Vec<Cow<'_, str>> = record.iter().map(decode_field).collect();
        let parsed = parse(&fields).map_err(|reason| RatingsError::MalformedInput {
            file: file.to_string(),
            line,
            reason,
        })?;
        records.push(parsed);
    }

    tracing::debug!(file, count = records.len(), "Parsed seed records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed_line(err: RatingsError) -> u64 {
        match err {
            RatingsError::MalformedInput { line, .. } => line,
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_movie_strips_year_and_parses_date() {
        let input = "242|Kolya (1996)|24-Jan-1997||http://us.imdb.com/M/title-exact?Kolya%20(1996)|0|0|0|0|0|1\n";
        let movies = parse_movies(input.as_bytes(), "u.item").unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].movie_id, 242);
        assert_eq!(movies[0].title, "Kolya");
        assert_eq!(movies[0].released_at, NaiveDate::from_ymd_opt(1997, 1, 24));
        assert!(movies[0].imdb_url.starts_with("http://us.imdb.com/"));
    }

    #[test]
    fn test_parse_movie_empty_date_is_none() {
        let input = "267|unknown||||0|0\n";
        let movies = parse_movies(input.as_bytes(), "u.item").unwrap();
        assert_eq!(movies[0].released_at, None);
        assert_eq!(movies[0].title, "");
    }

    #[test]
    fn test_parse_movie_latin1_title() {
        let mut input = b"1|Cit".to_vec();
        input.push(0xe9);
        input.extend_from_slice(b" (1999)|01-Jan-1999||http://x|0\n");
        let movies = parse_movies(input.as_slice(), "u.item").unwrap();
        assert_eq!(movies[0].title, "Cit\u{e9}");
    }

    #[test]
    fn test_parse_movie_with_quotes_in_title() {
        let input = "5|\"Copycat\" (1995)|01-Jan-1995||http://x\n";
        let movies = parse_movies(input.as_bytes(), "u.item").unwrap();
        assert_eq!(movies[0].title, "\"Copycat\"");
    }

    #[test]
    fn test_strip_year_suffix_short_title() {
        assert_eq!(strip_year_suffix("Heat (1995)"), "Heat");
        assert_eq!(strip_year_suffix("Up"), "");
        assert_eq!(strip_year_suffix(""), "");
    }

    #[test]
    fn test_parse_users_discards_gender_and_occupation() {
        let input = "1|24|M|technician|85711\r\n2|53|F|other|94043\n\n";
        let users = parse_users(input.as_bytes(), "u.user").unwrap();
        assert_eq!(
            users,
            vec![
                SeedUser {
                    user_id: 1,
                    age: Some(24),
                    zipcode: Some("85711".to_string()),
                },
                SeedUser {
                    user_id: 2,
                    age: Some(53),
                    zipcode: Some("94043".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_parse_users_rejects_wrong_field_count() {
        let input = "1|24|M|technician|85711\n2|53|F|other\n";
        let err = parse_users(input.as_bytes(), "u.user").unwrap_err();
        assert_eq!(malformed_line(err), 2);
    }

    #[test]
    fn test_parse_ratings() {
        let input = "196\t242\t3\t881250949\n186\t302\t3\t891717742  \n";
        let ratings = parse_ratings(input.as_bytes(), "u.data").unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(
            ratings[0],
            SeedRating {
                user_id: 196,
                movie_id: 242,
                score: 3,
            }
        );
    }

    #[test]
    fn test_parse_ratings_rejects_bad_integer() {
        let input = "196\t242\t3\t881250949\n186\tabc\t3\t891717742\n";
        let err = parse_ratings(input.as_bytes(), "u.data").unwrap_err();
        assert!(err.to_string().contains("movie_id"));
        assert_eq!(malformed_line(err), 2);
    }

    #[test]
    fn test_parse_movies_rejects_bad_date() {
        let input = "1|Toy Story (1995)|1995-01-01||http://x\n";
        let err = parse_movies(input.as_bytes(), "u.item").unwrap_err();
        assert!(err.to_string().starts_with("u.item:1:"));
    }

    #[test]
    fn test_parse_movies_rejects_too_few_fields() {
        let err = parse_movies("1|Toy Story (1995)\n".as_bytes(), "u.item").unwrap_err();
        assert_eq!(malformed_line(err), 1);
    }
}
