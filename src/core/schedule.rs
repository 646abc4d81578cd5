//! 訂閱的下次服務日預估 (僅供顯示)
//!
//! 服務固定在週一 (每週兩次的方案另有週四)，預估值不會儲存，也不代表實際排程

use crate::domain::model::ServiceFrequency;
use chrono::{Datelike, Days, NaiveDate, Weekday};

pub const ISO_DATE: &str = "%Y-%m-%d";

/// 明天起的下次預估服務日，日期超出 chrono 範圍時退回 `today`
pub fn next_service_date(freq: &str, today: NaiveDate) -> NaiveDate {
    match try_next_service_date(ServiceFrequency::from_code(freq), today) {
        Some(date) => date,
        None => {
            tracing::warn!(
                "Could not estimate next service date for {:?} from {}, using today",
                freq,
                today
            );
            today
        }
    }
}

/// [`next_service_date`] 的字串版本，日期格式錯誤時回傳 `fallback_today` 而不是錯誤
pub fn next_service_date_from_str(freq: &str, today: &str, fallback_today: NaiveDate) -> String {
    match NaiveDate::parse_from_str(today.trim(), ISO_DATE) {
        Ok(date) => format_iso(next_service_date(freq, date)),
        Err(e) => {
            tracing::warn!("Malformed date {:?} ({}), using today as the estimate", today, e);
            format_iso(fallback_today)
        }
    }
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

fn try_next_service_date(freq: ServiceFrequency, today: NaiveDate) -> Option<NaiveDate> {
    // 0 = 週日 .. 6 = 週六
    let weekday = u64::from(today.weekday().num_days_from_sunday());
    let to_monday = (8 - weekday) % 7;

    match freq {
        ServiceFrequency::Weekly => {
            let offset = if to_monday == 0 { 7 } else { to_monday };
            today.checked_add_days(Days::new(offset))
        }
        ServiceFrequency::TwiceWeekly => {
            let offset = match weekday {
                0 => 1,
                1..=3 => 4 - weekday,
                4 | 5 => 8 - weekday,
                _ => 2,
            };
            today.checked_add_days(Days::new(offset))
        }
        ServiceFrequency::Biweekly => today.checked_add_days(Days::new(to_monday + 7)),
        ServiceFrequency::Monthly => first_monday_of_next_month(today),
    }
}

fn first_monday_of_next_month(today: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if today.month() == 12 {
        (today.year().checked_add(1)?, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?
        .iter_days()
        .take(7)
        .find(|day| day.weekday() == Weekday::Mon)
}
