use chrono::{DateTime, Local, Utc};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a globally unique order id.
///
/// Layout: `ORD` + milliseconds since Unix epoch + 4 random digits.
/// The random suffix keeps ids unique when two devices place an order in the
/// same millisecond (ids are caller-generated, there is no central sequence).
pub fn generate_order_id() -> String {
    use rand::Rng;
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("ORD{}{:04}", now_millis(), suffix)
}

/// 两个时间点是否落在同一个本地自然日
pub fn is_same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.with_timezone(&Local).date_naive() == b.with_timezone(&Local).date_naive()
}
