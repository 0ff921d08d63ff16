use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::table::is_blank_token;

/// 한 그룹에서 서로 다른 이메일이 여러 개 나왔을 때의 선택 규칙.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    #[default]
    First,
    MostCommon,
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub recipient: Option<String>,
    pub has_conflict: bool,
    pub distinct_emails: Vec<String>,
}

/// 그룹의 이메일 후보 목록에서 수신자를 고른다. 절대 실패하지 않는다.
/// 공백/결측 토큰은 버리고, 고유 목록은 처음 등장한 순서를 유지한다.
pub fn resolve_recipient(raw_values: &[String], policy: ConflictPolicy) -> Resolution {
    let cleaned: Vec<String> = raw_values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !is_blank_token(v))
        .collect();

    let mut distinct: Vec<String> = Vec::new();
    for value in &cleaned {
        if !distinct.contains(value) {
            distinct.push(value.clone());
        }
    }

    let has_conflict = distinct.len() > 1;
    let recipient = match distinct.len() {
        0 => None,
        1 => Some(distinct[0].clone()),
        _ => match policy {
            ConflictPolicy::First => Some(distinct[0].clone()),
            ConflictPolicy::MostCommon => most_common(&cleaned, &distinct),
            ConflictPolicy::Skip => None,
        },
    };

    Resolution {
        recipient,
        has_conflict,
        distinct_emails: distinct,
    }
}

/// 최다 등장 값. 동률이면 처음 등장한 쪽을 유지한다.
fn most_common(cleaned: &[String], distinct: &[String]) -> Option<String> {
    let mut best: Option<(&String, usize)> = None;
    for candidate in distinct {
        let count = cleaned.iter().filter(|v| *v == candidate).count();
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((candidate, count)),
        }
    }
    best.map(|(value, _)| value.clone())
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("invalid email regex")
    })
}

pub fn validate_email(address: &str) -> bool {
    let address = address.trim();
    !address.is_empty() && email_re().is_match(address)
}
