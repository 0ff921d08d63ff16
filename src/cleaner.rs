use chrono::{Duration, NaiveDate};

use crate::table::{CellValue, Table};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%Y.%m.%d", "%d.%m.%Y", "%Y%m%d",
    "%m/%d/%Y", "%m-%d-%Y",
];

/// 지정된 컬럼만 정리한 새 테이블을 돌려준다. 지정되지 않은 컬럼은
/// 원본 스프레드시트 텍스트를 그대로 유지한다 (바이트 단위 보존).
/// 셀 단위 파싱 실패는 오류가 아니라 Missing으로 내려간다.
pub fn clean_table(
    table: &Table,
    amount_cols: &[String],
    percent_cols: &[String],
    date_cols: &[String],
    id_cols: &[String],
) -> Result<Table, String> {
    let mut cleaned = table.clone();

    for col in id_cols {
        let idx = cleaned.column_index(col)?;
        for row in 0..cleaned.row_count() {
            let next = clean_id_cell(cleaned.cell(row, idx));
            cleaned.set_cell(row, idx, next);
        }
    }

    for col in date_cols {
        let idx = cleaned.column_index(col)?;
        for row in 0..cleaned.row_count() {
            let next = normalize_date_cell(cleaned.cell(row, idx));
            cleaned.set_cell(row, idx, next);
        }
    }

    for col in amount_cols {
        let idx = cleaned.column_index(col)?;
        for row in 0..cleaned.row_count() {
            let next = numeric_cell(cleaned.cell(row, idx), parse_amount);
            cleaned.set_cell(row, idx, next);
        }
    }

    for col in percent_cols {
        let idx = cleaned.column_index(col)?;
        for row in 0..cleaned.row_count() {
            let next = numeric_cell(cleaned.cell(row, idx), parse_percent);
            cleaned.set_cell(row, idx, next);
        }
    }

    Ok(cleaned)
}

/// 쉼표/원화 기호를 제거하고 숫자로 파싱한다.
pub fn parse_amount(raw: &str) -> Option<f64> {
    parse_stripped(raw, &[',', '₩'])
}

/// 쉼표/% 기호를 제거하고 숫자로 파싱한다. 비율(0.15) 변환은 렌더링 단계의 몫이다.
pub fn parse_percent(raw: &str) -> Option<f64> {
    parse_stripped(raw, &[',', '%'])
}

fn parse_stripped(raw: &str, strip: &[char]) -> Option<f64> {
    let s: String = raw.trim().chars().filter(|c| !strip.contains(c)).collect();
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

fn numeric_cell(cell: &CellValue, parse: fn(&str) -> Option<f64>) -> CellValue {
    match cell {
        CellValue::Number(n) => CellValue::Number(*n),
        CellValue::Missing => CellValue::Missing,
        CellValue::Text(s) => match parse(s) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Missing,
        },
    }
}

/// 엑셀이 숫자 코드값에 붙이는 ".0" 꼬리를 제거한다.
fn clean_id_cell(cell: &CellValue) -> CellValue {
    if cell.is_missing() {
        return CellValue::Missing;
    }
    let text = cell.display_text();
    let trimmed = text.strip_suffix(".0").unwrap_or(&text);
    CellValue::Text(trimmed.to_string())
}

/// 날짜를 YYYY-MM-DD로 통일한다. 어떤 규칙에도 맞지 않으면 원본 텍스트를 유지한다.
fn normalize_date_cell(cell: &CellValue) -> CellValue {
    let raw = match cell {
        CellValue::Missing => return CellValue::Missing,
        other => other.display_text(),
    };
    if raw.is_empty() {
        return cell.clone();
    }
    if let Some(date) = parse_date_text(&raw).or_else(|| excel_serial_date(&raw)) {
        return CellValue::Text(date.format("%Y-%m-%d").to_string());
    }
    cell.clone()
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// 엑셀 직렬 날짜 (1899-12-30 기준 일수).
fn excel_serial_date(raw: &str) -> Option<NaiveDate> {
    let number = raw.parse::<f64>().ok()?;
    if !number.is_finite() || number <= 0.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(number.floor() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn one_column_table(name: &str, cells: &[CellValue]) -> Table {
        let mut table = Table::new(vec![name.to_string()]);
        for cell in cells {
            table.push_row(vec![cell.clone()]);
        }
        table
    }

    #[test]
    fn amount_cells_lose_separators_and_currency_symbol() {
        let table = one_column_table(
            "금액",
            &[text("1,250,000"), text("₩45,000"), text(" 100 "), text("-2,000")],
        );
        let cleaned = clean_table(&table, &["금액".to_string()], &[], &[], &[]).unwrap();
        assert_eq!(cleaned.cell(0, 0), &CellValue::Number(1_250_000.0));
        assert_eq!(cleaned.cell(1, 0), &CellValue::Number(45_000.0));
        assert_eq!(cleaned.cell(2, 0), &CellValue::Number(100.0));
        assert_eq!(cleaned.cell(3, 0), &CellValue::Number(-2_000.0));
    }

    #[test]
    fn unparseable_amounts_become_missing_not_errors() {
        let table = one_column_table("금액", &[text("미정"), text(""), CellValue::Missing]);
        let cleaned = clean_table(&table, &["금액".to_string()], &[], &[], &[]).unwrap();
        for row in 0..3 {
            assert_eq!(cleaned.cell(row, 0), &CellValue::Missing);
        }
    }

    #[test]
    fn percent_cells_keep_fraction_values_as_parsed() {
        let table = one_column_table("수수료율", &[text("15%"), text("0.15")]);
        let cleaned = clean_table(&table, &[], &["수수료율".to_string()], &[], &[]).unwrap();
        assert_eq!(cleaned.cell(0, 0), &CellValue::Number(15.0));
        assert_eq!(cleaned.cell(1, 0), &CellValue::Number(0.15));
    }

    #[test]
    fn dates_are_normalized_across_formats() {
        let table = one_column_table(
            "정산월",
            &[
                text("2026-01-15"),
                text("2026/01/15"),
                text("2026.01.15"),
                text("20260115"),
                text("01/15/2026"),
            ],
        );
        let cleaned = clean_table(&table, &[], &[], &["정산월".to_string()], &[]).unwrap();
        for row in 0..5 {
            assert_eq!(cleaned.cell(row, 0), &text("2026-01-15"), "row {row}");
        }
    }

    #[test]
    fn excel_serial_dates_fall_back_to_base_1899_12_30() {
        let table = one_column_table("정산월", &[text("45658")]);
        let cleaned = clean_table(&table, &[], &[], &["정산월".to_string()], &[]).unwrap();
        assert_eq!(cleaned.cell(0, 0), &text("2025-01-01"));
    }

    #[test]
    fn unrecognized_date_text_is_preserved() {
        let table = one_column_table("정산월", &[text("2026년 1월")]);
        let cleaned = clean_table(&table, &[], &[], &["정산월".to_string()], &[]).unwrap();
        assert_eq!(cleaned.cell(0, 0), &text("2026년 1월"));
    }

    #[test]
    fn id_cells_drop_trailing_point_zero() {
        let table = one_column_table("업체코드", &[text("10023.0"), text("A-77"), CellValue::Number(1001.0)]);
        let cleaned = clean_table(&table, &[], &[], &[], &["업체코드".to_string()]).unwrap();
        assert_eq!(cleaned.cell(0, 0), &text("10023"));
        assert_eq!(cleaned.cell(1, 0), &text("A-77"));
        assert_eq!(cleaned.cell(2, 0), &text("1001"));
    }

    #[test]
    fn untagged_columns_pass_through_untouched() {
        let mut table = Table::new(vec!["비고".to_string(), "금액".to_string()]);
        table.push_row(vec![text("1,000 (선지급)"), text("1,000")]);
        let cleaned = clean_table(&table, &["금액".to_string()], &[], &[], &[]).unwrap();
        assert_eq!(cleaned.cell(0, 0), &text("1,000 (선지급)"));
        assert_eq!(cleaned.cell(0, 1), &CellValue::Number(1_000.0));
    }

    #[test]
    fn unknown_configured_column_fails_fast() {
        let table = one_column_table("금액", &[text("1")]);
        let err = clean_table(&table, &["수수료".to_string()], &[], &[], &[]).unwrap_err();
        assert!(err.contains("수수료"));
    }
}
