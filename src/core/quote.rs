use crate::domain::model::{Quote, ServiceFrequency};

/// 0..=4 隻狗的每週價格，0 隻時報價為 0
const BASE_WEEKLY: [f64; 5] = [0.0, 15.0, 18.0, 22.0, 26.0];
const EXTRA_DOG_WEEKLY: f64 = 3.0;

/// 計算 `dogs` 隻狗在頻率 `freq` 下的每週與每月價格
///
/// 一律按月收費，不論頻率 `monthly` 都是每週價格的四倍，未知頻率以每週計價
pub fn calculate_quote(dogs: u32, freq: &str) -> Quote {
    let tier = dogs.min(4) as usize;
    let base = BASE_WEEKLY[tier] + f64::from(dogs.saturating_sub(4)) * EXTRA_DOG_WEEKLY;

    let weekly = match ServiceFrequency::from_code(freq) {
        ServiceFrequency::TwiceWeekly => base * 2.0,
        ServiceFrequency::Biweekly => base / 2.0,
        ServiceFrequency::Monthly => base / 4.0,
        ServiceFrequency::Weekly => base,
    };

    if !weekly.is_finite() {
        return Quote::ZERO;
    }

    Quote {
        weekly: round_cents(weekly),
        monthly: round_cents(weekly * 4.0),
    }
}

/// 從使用者輸入的狗數量報價，不是非負整數就回傳 [`Quote::ZERO`]
pub fn quote_for_input(dogs: &str, freq: &str) -> Quote {
    match dogs.trim().parse::<u32>() {
        Ok(count) => calculate_quote(count, freq),
        Err(_) => {
            tracing::debug!("Non-integer dog count {:?}, returning zero quote", dogs);
            Quote::ZERO
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
