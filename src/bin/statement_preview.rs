use cso_mailmerge::{
    clean_table, group_data_with_wildcard, load_table, merge_email_data, summarize_groups,
    GroupingConfig,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;
use std::io::{self, Read};
use std::path::Path;

const PREVIEW_GROUP_LIMIT: usize = 10;

/// 미리보기 작업 기술서. 파일 경로를 인자로 주거나 stdin으로 JSON을 넘긴다.
#[derive(Debug, Deserialize)]
struct PreviewJob {
    data_file: String,
    #[serde(default)]
    data_sheet: Option<String>,
    #[serde(default)]
    email_lookup: Option<EmailLookupJob>,
    grouping: GroupingConfig,
}

/// 이메일이 별도 시트/파일에 있을 때의 병합 설정.
#[derive(Debug, Deserialize)]
struct EmailLookupJob {
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    sheet: Option<String>,
    join_col_data: String,
    join_col_email: String,
    email_col: String,
}

fn run(job: &PreviewJob) -> Result<Value, String> {
    let mut table = load_table(Path::new(&job.data_file), job.data_sheet.as_deref())?;

    if let Some(lookup) = &job.email_lookup {
        let lookup_file = lookup.file.as_deref().unwrap_or(&job.data_file);
        let lookup_table = load_table(Path::new(lookup_file), lookup.sheet.as_deref())?;
        table = merge_email_data(
            &table,
            &lookup_table,
            &lookup.join_col_data,
            &lookup.join_col_email,
            &lookup.email_col,
        )?;
    }

    let config = &job.grouping;
    let cleaned = clean_table(
        &table,
        &config.amount_cols,
        &config.percent_cols,
        &config.date_cols,
        &config.id_cols,
    )?;
    let (groups, conflicts) = group_data_with_wildcard(&cleaned, config)?;
    let summary = summarize_groups(&groups);

    let preview_groups: Vec<Value> = groups
        .iter()
        .take(PREVIEW_GROUP_LIMIT)
        .map(|(key, record)| json!({ "group_key": key, "record": record }))
        .collect();

    Ok(json!({
        "data_file": job.data_file,
        "row_count": table.row_count(),
        "group_count": groups.len(),
        "summary": summary,
        "conflicts": conflicts,
        "preview_groups": preview_groups,
    }))
}

fn read_job(args: &[String]) -> Result<PreviewJob, String> {
    let raw = match args.first() {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("작업 파일 읽기 실패 ({path}): {e}"))?,
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .map_err(|e| format!("stdin 읽기 실패: {e}"))?;
            raw
        }
    };
    if raw.trim().is_empty() {
        return Err("작업 JSON이 비어 있습니다. 사용법: statement_preview <job.json>".to_string());
    }
    serde_json::from_str(&raw).map_err(|e| format!("작업 JSON 파싱 실패: {e}"))
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    match read_job(&args).and_then(|job| run(&job)) {
        Ok(payload) => {
            let rendered = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|_| "{}".to_string());
            println!("{rendered}");
        }
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}
