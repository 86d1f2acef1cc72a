/// Render a `YYYY-MM-DD` string as a Japanese long-form date.
///
/// `"2024-03-15"` becomes `"2024年3月15日"`. Leading zeros are dropped. Input
/// that is not three dash-separated integers is returned unchanged.
pub fn format_date(date: &str) -> String {
    let parts: Vec<&str> = date.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return date.to_string();
    };

    match (year.parse::<i64>(), month.parse::<i64>(), day.parse::<i64>()) {
        (Ok(year), Ok(month), Ok(day)) => format!("{year}年{month}月{day}日"),
        _ => date.to_string(),
    }
}
