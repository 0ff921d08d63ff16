use std::fmt;

/// 셀 값: 원본 텍스트를 보존하고, 정리 단계에서만 숫자로 바뀐다.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// 표시용 문자열 (앞뒤 공백 제거, 없는 값은 빈 문자열).
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Missing => String::new(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// 공백/결측 토큰 판정. 정리, 이메일 추출, 행 렌더링이 모두 이 판정 하나를 쓴다.
pub fn is_blank_token(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "" | "nan" | "none" | "nat"
    )
}

/// 컬럼명 목록과 행 목록으로 된 테이블. 모든 행은 컬럼 수에 맞춰 채워진다.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 짧은 행은 Missing으로 채우고 긴 행은 잘라서 넣는다.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(row);
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        &self.rows[row][col]
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        self.rows[row][col] = value;
    }

    pub fn column_index(&self, name: &str) -> Result<usize, String> {
        self.columns.iter().position(|c| c == name).ok_or_else(|| {
            format!(
                "컬럼을 찾을 수 없습니다: {name} (사용 가능한 컬럼: {})",
                self.columns.join(", ")
            )
        })
    }

    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<CellValue>) -> Result<(), String> {
        let name = name.into();
        if self.columns.contains(&name) {
            return Err(format!("이미 존재하는 컬럼입니다: {name}"));
        }
        if values.len() != self.rows.len() {
            return Err(format!(
                "컬럼 값 개수가 행 수와 다릅니다: {} != {}",
                values.len(),
                self.rows.len()
            ));
        }
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn push_row_pads_and_truncates() {
        let mut table = Table::new(vec!["a".to_string(), "b".to_string()]);
        table.push_row(vec![text("1")]);
        table.push_row(vec![text("1"), text("2"), text("3")]);
        assert_eq!(table.cell(0, 1), &CellValue::Missing);
        assert_eq!(table.rows()[1].len(), 2);
    }

    #[test]
    fn column_index_reports_missing_column() {
        let table = Table::new(vec!["업체".to_string(), "금액".to_string()]);
        assert_eq!(table.column_index("금액"), Ok(1));
        let err = table.column_index("이메일").unwrap_err();
        assert!(err.contains("이메일"));
        assert!(err.contains("업체"));
    }

    #[test]
    fn add_column_rejects_duplicates_and_length_mismatch() {
        let mut table = Table::new(vec!["a".to_string()]);
        table.push_row(vec![text("1")]);
        assert!(table.add_column("a", vec![text("x")]).is_err());
        assert!(table.add_column("b", vec![]).is_err());
        assert!(table.add_column("b", vec![text("x")]).is_ok());
        assert_eq!(table.cell(0, 1), &text("x"));
    }

    #[test]
    fn display_text_formats_integral_numbers_without_fraction() {
        assert_eq!(CellValue::Number(123.0).display_text(), "123");
        assert_eq!(CellValue::Number(1.5).display_text(), "1.5");
        assert_eq!(CellValue::Text("  에스투비  ".to_string()).display_text(), "에스투비");
        assert_eq!(CellValue::Missing.display_text(), "");
    }

    #[test]
    fn blank_token_covers_shared_sentinels() {
        for raw in ["", "   ", "nan", "NaN", "None", "NaT"] {
            assert!(is_blank_token(raw), "{raw:?} should be blank");
        }
        assert!(!is_blank_token("0"));
        assert!(!is_blank_token("a@x.com"));
    }
}
