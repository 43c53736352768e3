//! Invitation feed refinement.
//!
//! The repository returns every listed invitation; search, sport and date
//! filters are applied here on the fetched set.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::database::models::InvitationDetail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    #[default]
    All,
    Today,
    Tomorrow,
    ThisWeek,
    NextWeek,
    ThisMonth,
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(DateRange::All),
            "today" => Ok(DateRange::Today),
            "tomorrow" => Ok(DateRange::Tomorrow),
            "this-week" => Ok(DateRange::ThisWeek),
            "next-week" => Ok(DateRange::NextWeek),
            "this-month" => Ok(DateRange::ThisMonth),
            other => Err(format!("Invalid date range: {}", other)),
        }
    }
}

fn local_midnight(date: NaiveDate, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
}

impl DateRange {
    /// Half-open `[start, end)` window in UTC, or `None` for `All`.
    ///
    /// Weeks start on Sunday. Day boundaries follow the offset carried by `now`.
    pub fn window(self, now: DateTime<FixedOffset>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let offset = now.timezone();
        let today = now.date_naive();
        let day = Duration::days(1);
        let week = Duration::days(7);

        match self {
            DateRange::All => None,
            DateRange::Today => {
                let start = local_midnight(today, &offset)?;
                Some((start, start + day))
            }
            DateRange::Tomorrow => {
                let start = local_midnight(today, &offset)? + day;
                Some((start, start + day))
            }
            DateRange::ThisWeek | DateRange::NextWeek => {
                let days_since_sunday = i64::from(today.weekday().num_days_from_sunday());
                let mut start =
                    local_midnight(today, &offset)? - Duration::days(days_since_sunday);
                if self == DateRange::NextWeek {
                    start += week;
                }
                Some((start, start + week))
            }
            DateRange::ThisMonth => {
                let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
                let next_first = if today.month() == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)?
                };
                Some((
                    local_midnight(first, &offset)?,
                    local_midnight(next_first, &offset)?,
                ))
            }
        }
    }
}

/// Raw query string of `GET /invitations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    pub search: Option<String>,
    pub sport: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedFilter {
    /// Lowercased, trimmed search text; `None` when blank.
    pub search: Option<String>,
    pub sport_id: Option<Uuid>,
    pub date_range: DateRange,
}

impl FeedFilter {
    pub fn is_active(&self) -> bool {
        self.search.is_some() || self.sport_id.is_some() || self.date_range != DateRange::All
    }
}

impl TryFrom<FeedQuery> for FeedFilter {
    type Error = String;

    fn try_from(query: FeedQuery) -> Result<Self, Self::Error> {
        let search = query
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let sport_id = match query.sport.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(
                Uuid::parse_str(raw).map_err(|_| format!("Invalid sport id: {}", raw))?,
            ),
        };

        let date_range = match query.date {
            Some(raw) => raw.parse()?,
            None => DateRange::All,
        };

        Ok(FeedFilter {
            search,
            sport_id,
            date_range,
        })
    }
}

fn matches_search(item: &InvitationDetail, needle: &str) -> bool {
    item.invitation.venue.to_lowercase().contains(needle)
        || item.sport_name.to_lowercase().contains(needle)
        || item
            .invitation
            .note
            .as_ref()
            .is_some_and(|note| note.to_lowercase().contains(needle))
}

/// Drops unlisted invitations (cancelled or already started) and applies the
/// refinement filters, preserving the incoming order.
pub fn apply(
    items: Vec<InvitationDetail>,
    filter: &FeedFilter,
    now: DateTime<FixedOffset>,
) -> Vec<InvitationDetail> {
    let now_utc = now.with_timezone(&Utc);
    let window = filter.date_range.window(now);

    items
        .into_iter()
        .filter(|item| item.invitation.is_listed(now_utc))
        .filter(|item| {
            filter
                .search
                .as_deref()
                .is_none_or(|needle| matches_search(item, needle))
        })
        .filter(|item| {
            filter
                .sport_id
                .is_none_or(|sport_id| item.invitation.sport_id == sport_id)
        })
        .filter(|item| {
            window.is_none_or(|(start, end)| {
                item.invitation.start_at >= start && item.invitation.start_at < end
            })
        })
        .collect()
}
