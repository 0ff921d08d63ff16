use crate::table::CellValue;

/// 그룹 키 정규화: 와일드카드 접미사를 앞에서부터 한 번만 제거한다.
/// "에스투비 합계" -> "에스투비". 접미사가 없으면 trim만 한다.
pub fn normalize_group_key(raw: &CellValue, suffixes: &[String], wildcard_enabled: bool) -> String {
    let value = raw.display_text();
    if !wildcard_enabled {
        return value;
    }
    for suffix in suffixes {
        if suffix.is_empty() {
            continue;
        }
        if value.ends_with(suffix.as_str()) {
            return value[..value.len() - suffix.len()].trim().to_string();
        }
    }
    value
}

/// 원본 키 문자열이 접미사 중 하나로 끝나는지 (합계 행 판정).
pub(crate) fn ends_with_any(value: &str, suffixes: &[String]) -> bool {
    suffixes
        .iter()
        .any(|s| !s.is_empty() && value.ends_with(s.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixes() -> Vec<String> {
        vec![" 합계".to_string(), "합계".to_string()]
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn strips_first_matching_suffix_only() {
        assert_eq!(
            normalize_group_key(&text("에스투비 합계"), &suffixes(), true),
            "에스투비"
        );
        // 첫 번째 패턴(" 합계")이 우선 적용된다.
        assert_eq!(
            normalize_group_key(&text("에스투비 합계 합계"), &suffixes(), true),
            "에스투비 합계"
        );
    }

    #[test]
    fn idempotent_on_suffix_free_keys() {
        let key = normalize_group_key(&text("Acme Corp"), &suffixes(), true);
        assert_eq!(key, "Acme Corp");
        assert_eq!(
            normalize_group_key(&text(&key), &suffixes(), true),
            "Acme Corp"
        );
    }

    #[test]
    fn disabled_wildcard_returns_trimmed_value_unchanged() {
        assert_eq!(
            normalize_group_key(&text("  에스투비 합계  "), &suffixes(), false),
            "에스투비 합계"
        );
    }

    #[test]
    fn handles_numbers_and_missing() {
        assert_eq!(normalize_group_key(&CellValue::Number(1001.0), &suffixes(), true), "1001");
        assert_eq!(normalize_group_key(&CellValue::Missing, &suffixes(), true), "");
    }

    #[test]
    fn total_row_detection_matches_suffix_test() {
        assert!(ends_with_any("에스투비 합계", &suffixes()));
        assert!(!ends_with_any("에스투비", &suffixes()));
        assert!(!ends_with_any("에스투비", &[String::new()]));
    }
}
