/// 금액 표시 형식: 천단위 쉼표, 통화 기호 없음, 0/결측은 빈칸.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return String::new();
    }
    thousands(value as i64)
}

/// 퍼센트 표시 형식. (0,1) 구간 값은 비율로 보고 100을 곱한다 (0.15 -> 15.0%).
pub fn format_percent(value: f64) -> String {
    let mut num = value;
    if num > -1.0 && num < 1.0 && num != 0.0 {
        num *= 100.0;
    }
    format!("{num:.1}%")
}

fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && idx % 3 == lead % 3 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
