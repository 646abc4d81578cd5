use crate::domain::ports::Clock;
use chrono::{DateTime, NaiveDate, Utc};

/// 固定時間的時鐘，本地的「今天」另外指定
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self { now, today }
    }

    /// 固定在 `timestamp`，「今天」取其 UTC 日期
    pub fn at_unix(timestamp: i64) -> Option<Self> {
        let now = DateTime::from_timestamp(timestamp, 0)?;
        Some(Self::new(now, now.date_naive()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
