use calamine::{open_workbook_auto, Reader};
use std::path::Path;

use crate::table::{CellValue, Table};

/// 엑셀/CSV 파일을 테이블로 읽는다. 첫 번째 비어있지 않은 행이 헤더가 된다.
/// CSV는 시트 개념이 없으므로 sheet 인자를 무시한다.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    if !path.is_file() {
        return Err(format!(
            "파일을 찾을 수 없습니다: {}",
            path.to_string_lossy()
        ));
    }

    let suffix = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let rows = match suffix.as_str() {
        "csv" => read_csv_rows(path)?,
        "xlsx" | "xls" => read_workbook_rows(path, sheet)?,
        _ => {
            return Err(format!(
                "지원하지 않는 파일 형식입니다: .{suffix} (.csv/.xlsx/.xls 지원)"
            ))
        }
    };

    table_from_rows(rows)
}

fn trim_cell(text: &str) -> String {
    text.trim()
        .trim_start_matches('\u{feff}')
        .trim()
        .to_string()
}

fn cell_from_text(text: &str) -> CellValue {
    if text.is_empty() {
        CellValue::Missing
    } else {
        CellValue::Text(text.to_string())
    }
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| format!("CSV 읽기 실패: {e}"))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("CSV 행 읽기 실패: {e}"))?;
        rows.push(record.iter().map(trim_cell).collect());
    }
    Ok(rows)
}

fn read_workbook_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<String>>, String> {
    let mut workbook = open_workbook_auto(path).map_err(|e| format!("엑셀 열기 실패: {e}"))?;
    let sheet_names = workbook.sheet_names().to_owned();

    let target = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(format!(
                    "시트를 찾을 수 없습니다: {name} (사용 가능한 시트: {})",
                    sheet_names.join(", ")
                ));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| "엑셀 파일에 시트가 없습니다.".to_string())?,
    };

    let range = workbook
        .worksheet_range(&target)
        .map_err(|e| format!("시트 읽기 실패: {e}"))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(|cell| trim_cell(&cell.to_string())).collect())
        .collect())
}

fn table_from_rows(rows: Vec<Vec<String>>) -> Result<Table, String> {
    let header_pos = rows
        .iter()
        .position(|row| row.iter().any(|c| !c.is_empty()))
        .ok_or_else(|| "시트에 데이터가 없습니다.".to_string())?;

    let mut keep: Vec<usize> = Vec::new();
    let mut columns: Vec<String> = Vec::new();
    for (idx, name) in rows[header_pos].iter().enumerate() {
        if name.is_empty() {
            continue;
        }
        if columns.contains(name) {
            return Err(format!("중복된 컬럼명입니다: {name}"));
        }
        keep.push(idx);
        columns.push(name.clone());
    }

    let mut table = Table::new(columns);
    for row in rows.iter().skip(header_pos + 1) {
        if row.iter().all(|c| c.is_empty()) {
            continue;
        }
        table.push_row(
            keep.iter()
                .map(|&i| cell_from_text(row.get(i).map(String::as_str).unwrap_or("")))
                .collect(),
        );
    }
    Ok(table)
}
