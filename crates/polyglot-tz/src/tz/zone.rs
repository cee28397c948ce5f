//! A single unpacked time zone.
//!
//! A packed zone has six `|`-separated fields:
//!
//! ```text
//! Europe/Sofia|EET EEST|-20 -30|01010|2c5d0 1o00 11A0 1o00|12e5
//! name        |abbrs   |offsets|indices|until deltas       |population
//! ```
//!
//! Offsets are base-60 minutes *west* of UTC (EET is `-20`, i.e. -120).
//! Each index digit selects the abbreviation and offset of one period.
//! Until deltas are base-60 minutes; summed they give the UTC instant each
//! period ends. The last period never ends.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use polyglot_core::{PolyglotError, PolyglotResult};

use super::base60::{pack_base60, unpack_base60};

/// The end of the last period.
pub const UNBOUNDED: i64 = i64::MAX;

const MINUTE_MS: f64 = 60_000.0;

/// How [`Zone::parse_with`] resolves wall times that occur twice or never.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Take the later instant of a repeated wall time.
    pub move_ambiguous_forward: bool,
    /// Push a skipped wall time past the transition.
    pub move_invalid_forward: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            move_ambiguous_forward: false,
            move_invalid_forward: true,
        }
    }
}

/// An unpacked zone: one abbreviation, offset and end instant per period.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    name: String,
    abbrs: Vec<String>,
    offsets: Vec<f64>,
    untils: Vec<i64>,
    population: f64,
}

impl Zone {
    /// A zone that is always UTC.
    pub fn utc() -> Self {
        Self {
            name: "UTC".to_string(),
            abbrs: vec!["UTC".to_string()],
            offsets: vec![0.0],
            untils: vec![UNBOUNDED],
            population: 0.0,
        }
    }

    /// Unpacks a packed zone string.
    ///
    /// # Examples
    ///
    /// ```
    /// use polyglot_tz::tz::Zone;
    ///
    /// let zone = Zone::unpack("Europe/Sofia|EET EEST|-20 -30|01010|2c5d0 1o00 11A0 1o00|12e5").unwrap();
    /// assert_eq!(zone.name(), "Europe/Sofia");
    /// assert_eq!(zone.abbrs(), ["EET", "EEST", "EET", "EEST", "EET"]);
    /// assert_eq!(zone.population(), 1_200_000.0);
    /// ```
    pub fn unpack(packed: &str) -> PolyglotResult<Self> {
        let fields: Vec<&str> = packed.split('|').collect();
        if !(5..=6).contains(&fields.len()) || fields[0].is_empty() {
            return Err(invalid(packed, "expected name|abbrs|offsets|indices|untils|population"));
        }

        let abbr_table: Vec<&str> = fields[1].split(' ').collect();
        let offset_table = fields[2]
            .split(' ')
            .map(unpack_base60)
            .collect::<PolyglotResult<Vec<f64>>>()?;
        if offset_table.iter().any(|o| o.abs() >= 24.0 * 60.0) {
            return Err(invalid(packed, "offset of a day or more"));
        }

        let mut indices = Vec::with_capacity(fields[3].len());
        for c in fields[3].chars() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = unpack_base60(c.encode_utf8(&mut [0; 4]))? as usize;
            if index >= abbr_table.len() || index >= offset_table.len() {
                return Err(invalid(packed, "period index out of range"));
            }
            indices.push(index);
        }
        if indices.is_empty() {
            return Err(invalid(packed, "no periods"));
        }

        let deltas = fields[4]
            .split(' ')
            .filter(|s| !s.is_empty())
            .map(unpack_base60)
            .collect::<PolyglotResult<Vec<f64>>>()?;
        if deltas.len() + 1 < indices.len() {
            return Err(invalid(packed, "fewer untils than periods"));
        }

        let mut untils = Vec::with_capacity(indices.len());
        let mut last = 0.0_f64;
        for delta in deltas.iter().take(indices.len() - 1) {
            last = delta.mul_add(MINUTE_MS, last).round();
            #[allow(clippy::cast_possible_truncation)]
            untils.push(last as i64);
        }
        untils.push(UNBOUNDED);

        let population = match fields.get(5) {
            Some(p) if !p.is_empty() => p
                .parse::<f64>()
                .map_err(|_| invalid(packed, "population is not a number"))?,
            _ => 0.0,
        };

        Ok(Self {
            name: fields[0].to_string(),
            abbrs: indices.iter().map(|&i| abbr_table[i].to_string()).collect(),
            offsets: indices.iter().map(|&i| offset_table[i]).collect(),
            untils,
            population,
        })
    }

    /// Packs the zone back into its string form.
    pub fn pack(&self) -> String {
        let mut abbrs: Vec<&str> = Vec::new();
        let mut offsets: Vec<String> = Vec::new();
        let mut keys: Vec<(&str, f64)> = Vec::new();
        let mut indices = String::with_capacity(self.abbrs.len());

        for (abbr, &offset) in self.abbrs.iter().zip(&self.offsets) {
            let abbr = abbr.as_str();
            let position = keys
                .iter()
                .position(|&(a, o)| a == abbr && o.to_bits() == offset.to_bits())
                .unwrap_or_else(|| {
                    keys.push((abbr, offset));
                    abbrs.push(abbr);
                    offsets.push(pack_base60((offset * 60.0).round() / 60.0, 1));
                    keys.len() - 1
                });
            #[allow(clippy::cast_precision_loss)]
            indices.push_str(&pack_base60(position as f64, 0));
        }

        let mut last = 0_i64;
        let untils: Vec<String> = self.untils[..self.untils.len() - 1]
            .iter()
            .map(|&until| {
                #[allow(clippy::cast_precision_loss)]
                let minutes = ((until - last) as f64 / 1000.0).round() / 60.0;
                last = until;
                pack_base60(minutes, 1)
            })
            .collect();

        [
            self.name.clone(),
            abbrs.join(" "),
            offsets.join(" "),
            indices,
            untils.join(" "),
            pack_population(self.population),
        ]
        .join("|")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the same zone data under another name (for links).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Abbreviation of every period.
    pub fn abbrs(&self) -> &[String] {
        &self.abbrs
    }

    /// Offset of every period in minutes west of UTC.
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// End of every period in epoch milliseconds; the last is [`UNBOUNDED`].
    pub fn untils(&self) -> &[i64] {
        &self.untils
    }

    pub const fn population(&self) -> f64 {
        self.population
    }

    /// The period containing the UTC instant `timestamp_ms`.
    pub fn index(&self, timestamp_ms: i64) -> usize {
        self.untils
            .iter()
            .position(|&until| timestamp_ms < until)
            .unwrap_or(self.untils.len() - 1)
    }

    /// Offset in minutes west of UTC at a UTC instant.
    pub fn utc_offset(&self, timestamp_ms: i64) -> f64 {
        self.offsets[self.index(timestamp_ms)]
    }

    pub fn abbr(&self, timestamp_ms: i64) -> &str {
        &self.abbrs[self.index(timestamp_ms)]
    }

    /// Offset in minutes west of UTC for a wall-clock time, given as
    /// milliseconds since the epoch as if the wall time were UTC.
    pub fn parse(&self, local_ms: i64) -> f64 {
        self.parse_with(local_ms, ParseOptions::default())
    }

    /// [`Zone::parse`] with explicit gap and overlap handling.
    pub fn parse_with(&self, local_ms: i64, options: ParseOptions) -> f64 {
        let periods = self.untils.len();
        let candidates: Vec<usize> = (0..periods)
            .filter(|&i| self.local_start(i) <= local_ms && local_ms < self.local_end(i))
            .collect();

        match candidates.as_slice() {
            [only] => self.offsets[*only],
            [first, .., last] => {
                if options.move_ambiguous_forward {
                    self.offsets[*last]
                } else {
                    self.offsets[*first]
                }
            }
            [] => {
                // The wall time falls between the end of one period and the
                // start of the next.
                let next = (1..periods)
                    .find(|&i| local_ms < self.local_start(i))
                    .unwrap_or(periods - 1);
                if options.move_invalid_forward {
                    self.offsets[next.saturating_sub(1)]
                } else {
                    self.offsets[next]
                }
            }
        }
    }

    fn local_start(&self, period: usize) -> i64 {
        if period == 0 {
            i64::MIN
        } else {
            self.untils[period - 1].saturating_sub(offset_ms(self.offsets[period]))
        }
    }

    fn local_end(&self, period: usize) -> i64 {
        match self.untils[period] {
            UNBOUNDED => i64::MAX,
            until => until.saturating_sub(offset_ms(self.offsets[period])),
        }
    }

    /// The UTC offset in effect at an instant.
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        let west = self.utc_offset(instant.timestamp_millis());
        #[allow(clippy::cast_possible_truncation)]
        let east_seconds = (-west * 60.0).round() as i32;
        FixedOffset::east_opt(east_seconds)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("UTC offset"))
    }

    /// Converts a UTC instant into this zone's wall time.
    pub fn to_local(&self, instant: &DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset_at(instant))
    }

    /// Resolves a wall-clock time in this zone.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use polyglot_tz::tz::Zone;
    ///
    /// let new_york = Zone::unpack("America/New_York|EST EDT|50 40|01010|2bUT0 1zb0 Op0 1zb0|21e6").unwrap();
    /// // 02:30 does not exist on 2024-03-10; it moves forward to 03:30 EDT.
    /// let wall = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(2, 30, 0).unwrap();
    /// let resolved = new_york.from_local(&wall).unwrap();
    /// assert_eq!(resolved.to_rfc3339(), "2024-03-10T03:30:00-04:00");
    /// ```
    pub fn from_local(&self, wall: &NaiveDateTime) -> PolyglotResult<DateTime<FixedOffset>> {
        self.from_local_with(wall, ParseOptions::default())
    }

    /// [`Zone::from_local`] with explicit gap and overlap handling.
    pub fn from_local_with(
        &self,
        wall: &NaiveDateTime,
        options: ParseOptions,
    ) -> PolyglotResult<DateTime<FixedOffset>> {
        let local_ms = wall.and_utc().timestamp_millis();
        let west = self.parse_with(local_ms, options);
        let instant = local_ms
            .checked_add(offset_ms(west))
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| {
                PolyglotError::DateOutOfRange(format!("{wall} in {}", self.name))
            })?;
        Ok(self.to_local(&instant))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn offset_ms(minutes_west: f64) -> i64 {
    (minutes_west * MINUTE_MS).round() as i64
}

fn pack_population(population: f64) -> String {
    if population <= 0.0 || !population.is_finite() {
        return String::new();
    }
    if population < 1000.0 {
        return format!("{population}");
    }
    #[allow(clippy::cast_possible_truncation)]
    let digits = (population.trunc() as i64).to_string().len();
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let exponent = digits as i32 - 2;
    let mantissa = (population / 10_f64.powi(exponent)).round();
    format!("{mantissa}e{exponent}")
}

fn invalid(packed: &str, reason: &str) -> PolyglotError {
    PolyglotError::InvalidPackedData(format!("{reason}: {packed:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    const SOFIA: &str = "Europe/Sofia|EET EEST|-20 -30|01010|2c5d0 1o00 11A0 1o00|12e5";
    const NEW_YORK: &str = "America/New_York|EST EDT|50 40|01010|2bUT0 1zb0 Op0 1zb0|21e6";
    const UTC: &str = "Etc/UTC|UTC|0|0||";

    fn utc_ms(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap().timestamp_millis()
    }

    fn wall(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, 0).unwrap()
    }

    #[test]
    fn test_unpack_sofia() {
        let zone = Zone::unpack(SOFIA).unwrap();
        assert_eq!(zone.offsets(), [-120.0, -180.0, -120.0, -180.0, -120.0]);
        assert_eq!(
            zone.untils(),
            [
                utc_ms(2024, 3, 31, 1, 0),
                utc_ms(2024, 10, 27, 1, 0),
                utc_ms(2025, 3, 30, 1, 0),
                utc_ms(2025, 10, 26, 1, 0),
                UNBOUNDED,
            ]
        );
    }

    #[test]
    fn test_unpack_new_york_transitions() {
        let zone = Zone::unpack(NEW_YORK).unwrap();
        assert_eq!(zone.untils()[0], utc_ms(2024, 3, 10, 7, 0));
        assert_eq!(zone.untils()[1], utc_ms(2024, 11, 3, 6, 0));
        assert_eq!(zone.untils()[2], utc_ms(2025, 3, 9, 7, 0));
        assert_eq!(zone.untils()[3], utc_ms(2025, 11, 2, 6, 0));
        assert_eq!(zone.population(), 21_000_000.0);
    }

    #[test]
    fn test_unpack_fixed_zone() {
        let zone = Zone::unpack(UTC).unwrap();
        assert_eq!(zone.untils(), [UNBOUNDED]);
        assert_eq!(zone.offsets(), [0.0]);
        assert_eq!(zone.population(), 0.0);
        assert_eq!(zone.abbr(0), "UTC");
    }

    #[test]
    fn test_unpack_rejects_malformed() {
        assert!(Zone::unpack("").is_err());
        assert!(Zone::unpack("A|B").is_err());
        assert!(Zone::unpack("X|A|0|01|").is_err());
        assert!(Zone::unpack("X|A B|0 10|012|1 1|").is_err());
        assert!(Zone::unpack("X|A|0|0||lots").is_err());
        assert!(Zone::unpack("X|A|O0|0||").is_err());
    }

    #[test]
    fn test_pack_round_trip() {
        for packed in [SOFIA, NEW_YORK, UTC] {
            assert_eq!(Zone::unpack(packed).unwrap().pack(), packed);
        }
    }

    #[test]
    fn test_index_edges() {
        let zone = Zone::unpack(SOFIA).unwrap();
        assert_eq!(zone.index(i64::MIN), 0);
        assert_eq!(zone.index(0), 0);
        assert_eq!(zone.index(utc_ms(2024, 3, 31, 0, 59)), 0);
        assert_eq!(zone.index(utc_ms(2024, 3, 31, 1, 0)), 1);
        assert_eq!(zone.index(utc_ms(2030, 1, 1, 0, 0)), 4);
        assert_eq!(zone.index(i64::MAX), 4);
    }

    #[test]
    fn test_offset_and_abbr() {
        let zone = Zone::unpack(SOFIA).unwrap();
        let summer = utc_ms(2024, 7, 1, 12, 0);
        assert_eq!(zone.utc_offset(summer), -180.0);
        assert_eq!(zone.abbr(summer), "EEST");
        assert_eq!(zone.abbr(utc_ms(2024, 12, 1, 12, 0)), "EET");

        let instant = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(zone.offset_at(&instant).local_minus_utc(), 3 * 3600);
        assert_eq!(zone.to_local(&instant).to_rfc3339(), "2024-07-01T15:00:00+03:00");
    }

    #[test]
    fn test_from_local_unambiguous() {
        let zone = Zone::unpack(NEW_YORK).unwrap();
        let winter = zone.from_local(&wall(2024, 1, 15, 12, 0)).unwrap();
        assert_eq!(winter.to_rfc3339(), "2024-01-15T12:00:00-05:00");
        let summer = zone.from_local(&wall(2024, 7, 1, 12, 0)).unwrap();
        assert_eq!(summer.to_rfc3339(), "2024-07-01T12:00:00-04:00");
    }

    #[test]
    fn test_from_local_gap() {
        let zone = Zone::unpack(SOFIA).unwrap();
        let forward = zone.from_local(&wall(2024, 3, 31, 3, 30)).unwrap();
        assert_eq!(forward.to_rfc3339(), "2024-03-31T04:30:00+03:00");

        let options = ParseOptions {
            move_invalid_forward: false,
            ..ParseOptions::default()
        };
        let backward = zone.from_local_with(&wall(2024, 3, 31, 3, 30), options).unwrap();
        assert_eq!(backward.to_rfc3339(), "2024-03-31T02:30:00+02:00");
    }

    #[test]
    fn test_from_local_overlap() {
        let zone = Zone::unpack(NEW_YORK).unwrap();
        let earlier = zone.from_local(&wall(2024, 11, 3, 1, 30)).unwrap();
        assert_eq!(earlier.to_rfc3339(), "2024-11-03T01:30:00-04:00");

        let options = ParseOptions {
            move_ambiguous_forward: true,
            ..ParseOptions::default()
        };
        let later = zone.from_local_with(&wall(2024, 11, 3, 1, 30), options).unwrap();
        assert_eq!(later.to_rfc3339(), "2024-11-03T01:30:00-05:00");
    }

    #[test]
    fn test_parse_returns_minutes_west() {
        let zone = Zone::unpack(NEW_YORK).unwrap();
        let local = wall(2024, 7, 1, 12, 0).and_utc().timestamp_millis();
        assert_eq!(zone.parse(local), 240.0);
    }

    #[test]
    fn test_utc_zone_constructor() {
        let zone = Zone::utc();
        assert_eq!(zone.utc_offset(utc_ms(2024, 1, 1, 0, 0)), 0.0);
        let resolved = zone.from_local(&wall(2024, 1, 1, 0, 0)).unwrap();
        assert_eq!(resolved.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }
}
