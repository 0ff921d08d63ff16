use std::collections::HashMap;

use crate::table::{CellValue, Table};

/// 정산 데이터에 이메일 시트를 left join으로 붙인다.
/// join 키는 문자열 캐스팅 + trim으로 맞추고, 이메일 시트는 키 기준으로
/// 첫 행만 쓴다. 매칭이 없는 행은 Missing 이메일을 갖고 그대로 유지된다.
pub fn merge_email_data(
    primary: &Table,
    lookup: &Table,
    primary_join_col: &str,
    lookup_join_col: &str,
    lookup_email_col: &str,
) -> Result<Table, String> {
    let primary_idx = primary.column_index(primary_join_col)?;
    let lookup_idx = lookup.column_index(lookup_join_col)?;
    let email_idx = lookup.column_index(lookup_email_col)?;
    if primary.columns().iter().any(|c| c == lookup_email_col) {
        return Err(format!(
            "이메일 컬럼명이 정산 데이터에 이미 존재합니다: {lookup_email_col}"
        ));
    }

    let mut email_by_key: HashMap<String, CellValue> = HashMap::new();
    for row in lookup.rows() {
        let key = row[lookup_idx].display_text();
        email_by_key.entry(key).or_insert_with(|| row[email_idx].clone());
    }

    let emails: Vec<CellValue> = primary
        .rows()
        .iter()
        .map(|row| {
            email_by_key
                .get(&row[primary_idx].display_text())
                .cloned()
                .unwrap_or(CellValue::Missing)
        })
        .collect();

    let mut merged = primary.clone();
    merged.add_column(lookup_email_col, emails)?;
    Ok(merged)
}
