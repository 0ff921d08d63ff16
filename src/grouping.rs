use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cleaner::{parse_amount, parse_percent};
use crate::email_resolver::{resolve_recipient, validate_email, ConflictPolicy};
use crate::format::{format_currency, format_percent};
use crate::group_key::{ends_with_any, normalize_group_key};
use crate::table::{is_blank_token, CellValue, Table};

fn default_true() -> bool {
    true
}

fn default_suffixes() -> Vec<String> {
    vec![" 합계".to_string()]
}

/// 한 번의 그룹핑 실행에 쓰이는 고정 설정. 전역 상태 없이 이 구조체 하나만 받는다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingConfig {
    pub group_key_col: String,
    #[serde(default)]
    pub email_col: Option<String>,
    #[serde(default)]
    pub amount_cols: Vec<String>,
    #[serde(default)]
    pub percent_cols: Vec<String>,
    #[serde(default)]
    pub date_cols: Vec<String>,
    #[serde(default)]
    pub id_cols: Vec<String>,
    pub display_cols: Vec<String>,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    #[serde(default = "default_true")]
    pub wildcard_enabled: bool,
    #[serde(default = "default_suffixes")]
    pub wildcard_suffixes: Vec<String>,
    #[serde(default)]
    pub calculate_totals: bool,
}

/// 그룹 하나의 정산서 레코드. 반환된 뒤에는 수정되지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRecord {
    pub recipient_email: Option<String>,
    pub rows: Vec<BTreeMap<String, String>>,
    pub totals: BTreeMap<String, String>,
    pub row_count: usize,
    pub has_conflict: bool,
    pub conflict_emails: Vec<String>,
}

/// 이메일 충돌 기록. 선택 정책과 무관하게 충돌이 있으면 항상 남는다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictEntry {
    pub group_key: String,
    pub emails: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupingSummary {
    pub total_groups: usize,
    pub sendable_groups: usize,
    pub missing_email_groups: usize,
    pub conflicted_groups: usize,
}

#[derive(Clone, Copy)]
enum CellRole {
    Amount,
    Percent,
    Plain,
}

/// 정리된 테이블을 그룹 키 기준으로 정산서 레코드 맵으로 변환한다.
///
/// - 키가 빈 값/"nan"/"none"/"(비어 있음)"으로 정규화되는 행은 버린다.
/// - 와일드카드가 켜져 있으면 데이터 행이 먼저, 합계 접미사 행이 나중에 온다
///   (각각 원래 상대 순서 유지). 꺼져 있으면 원래 순서 그대로다.
/// - 합계는 calculate_totals가 켜진 경우에만 계산하며, 와일드카드 모드에서는
///   접미사 행을 제외한 데이터 행만 합산한다. 0 합계는 빈 문자열로 나간다.
pub fn group_data_with_wildcard(
    table: &Table,
    config: &GroupingConfig,
) -> Result<(BTreeMap<String, GroupRecord>, Vec<ConflictEntry>), String> {
    let group_idx = table.column_index(&config.group_key_col)?;
    let email_idx = match &config.email_col {
        Some(col) => Some(table.column_index(col)?),
        None => None,
    };
    let amount_plan: Vec<(String, usize)> = config
        .amount_cols
        .iter()
        .map(|col| Ok((col.clone(), table.column_index(col)?)))
        .collect::<Result<_, String>>()?;
    for col in &config.percent_cols {
        table.column_index(col)?;
    }
    // 표시 컬럼은 예외적으로 느슨하다: 테이블에 없으면 빈 문자열로 렌더링된다.
    let display_plan: Vec<(String, Option<usize>, CellRole)> = config
        .display_cols
        .iter()
        .map(|col| {
            let role = if config.amount_cols.contains(col) {
                CellRole::Amount
            } else if config.percent_cols.contains(col) {
                CellRole::Percent
            } else {
                CellRole::Plain
            };
            (col.clone(), table.column_index(col).ok(), role)
        })
        .collect();

    let mut partitions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for row_idx in 0..table.row_count() {
        let key = normalize_group_key(
            table.cell(row_idx, group_idx),
            &config.wildcard_suffixes,
            config.wildcard_enabled,
        );
        partitions.entry(key).or_default().push(row_idx);
    }

    let mut groups: BTreeMap<String, GroupRecord> = BTreeMap::new();
    let mut conflicts: Vec<ConflictEntry> = Vec::new();

    for (base_key, row_indices) in partitions {
        if is_skipped_group_key(&base_key) {
            continue;
        }

        let raw_emails: Vec<String> = match email_idx {
            Some(idx) => row_indices
                .iter()
                .map(|&row| table.cell(row, idx).display_text())
                .collect(),
            None => Vec::new(),
        };
        let resolution = resolve_recipient(&raw_emails, config.conflict_policy);
        if resolution.has_conflict {
            conflicts.push(ConflictEntry {
                group_key: base_key.clone(),
                emails: resolution.distinct_emails.clone(),
                selected: resolution.recipient.clone(),
            });
        }

        let mut data_rows: Vec<usize> = Vec::new();
        let mut total_rows: Vec<usize> = Vec::new();
        for &row in &row_indices {
            let raw_key = table.cell(row, group_idx).display_text();
            if ends_with_any(&raw_key, &config.wildcard_suffixes) {
                total_rows.push(row);
            } else {
                data_rows.push(row);
            }
        }

        let ordered: Vec<usize> = if config.wildcard_enabled {
            data_rows.iter().chain(total_rows.iter()).copied().collect()
        } else {
            row_indices.clone()
        };

        let rows: Vec<BTreeMap<String, String>> = ordered
            .iter()
            .map(|&row| render_row(table, row, &display_plan))
            .collect();

        let mut totals: BTreeMap<String, String> = BTreeMap::new();
        if config.calculate_totals {
            let total_source: &[usize] = if config.wildcard_enabled {
                &data_rows
            } else {
                &row_indices
            };
            for (col, idx) in &amount_plan {
                let sum: f64 = total_source
                    .iter()
                    .map(|&row| amount_number(table.cell(row, *idx)))
                    .sum();
                totals.insert(col.clone(), format_currency(sum));
            }
        }

        groups.insert(
            base_key.clone(),
            GroupRecord {
                recipient_email: resolution.recipient,
                row_count: rows.len(),
                rows,
                totals,
                has_conflict: resolution.has_conflict,
                conflict_emails: if resolution.has_conflict {
                    resolution.distinct_emails
                } else {
                    Vec::new()
                },
            },
        );
    }

    Ok((groups, conflicts))
}

/// 검토 화면용 집계: 전체 / 발송 가능 / 이메일 없음 / 충돌.
pub fn summarize_groups(groups: &BTreeMap<String, GroupRecord>) -> GroupingSummary {
    let sendable = groups
        .values()
        .filter(|g| g.recipient_email.as_deref().is_some_and(validate_email))
        .count();
    GroupingSummary {
        total_groups: groups.len(),
        sendable_groups: sendable,
        missing_email_groups: groups.len() - sendable,
        conflicted_groups: groups.values().filter(|g| g.has_conflict).count(),
    }
}

fn is_skipped_group_key(key: &str) -> bool {
    let lowered = key.trim().to_lowercase();
    lowered.is_empty() || matches!(lowered.as_str(), "nan" | "none" | "(비어 있음)")
}

fn render_row(
    table: &Table,
    row: usize,
    display_plan: &[(String, Option<usize>, CellRole)],
) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (name, idx, role) in display_plan {
        let text = match idx {
            None => String::new(),
            Some(idx) => render_cell(table.cell(row, *idx), *role),
        };
        out.insert(name.clone(), text);
    }
    out
}

fn render_cell(cell: &CellValue, role: CellRole) -> String {
    match role {
        CellRole::Amount => format_currency(amount_number(cell)),
        CellRole::Percent => match cell {
            CellValue::Missing => String::new(),
            CellValue::Number(n) => format_percent(*n),
            CellValue::Text(s) => {
                if is_blank_token(s) {
                    String::new()
                } else {
                    parse_percent(s)
                        .map(format_percent)
                        .unwrap_or_else(|| s.trim().to_string())
                }
            }
        },
        CellRole::Plain => match cell {
            CellValue::Missing => String::new(),
            CellValue::Number(n) if *n == 0.0 => String::new(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => {
                if is_blank_token(s) {
                    String::new()
                } else {
                    s.trim().to_string()
                }
            }
        },
    }
}

/// 합계 계산용 숫자 값. 정리되지 않은 텍스트도 금액 규칙으로 다시 파싱해 본다.
fn amount_number(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => parse_amount(s).unwrap_or(0.0),
        CellValue::Missing => 0.0,
    }
}
