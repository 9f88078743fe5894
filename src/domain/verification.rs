//! import 직후 재-export 내용 비교 규칙.
//!
//! 비교 전 정규화: `\r\n` → `\n`, 끝의 개행 문자 전부 제거.
//! 앞부분/중간 공백은 그대로 비교한다.

use thiserror::Error;

const CONTEXT_LINES: usize = 3;
/// 정렬 테이블 칸 수 상한(u32 기준 약 16MB).
const MAX_TABLE_CELLS: usize = 4_000_000;

/// 기록 요청 내용과 원격 저장 내용이 다를 때의 실패 정보.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("verification mismatch: content stored at {path} differs from the content sent")]
pub struct VerificationMismatch {
    pub path: String,
    pub diff: String,
}

/// 비교용 정규화.
pub fn normalize(content: &str) -> String {
    content.replace("\r\n", "\n").trim_end_matches('\n').to_string()
}

/// 정규화 후 두 내용이 같으면 Ok, 다르면 unified diff 를 담은 오류를 반환한다.
pub fn compare(path: &str, expected: &str, actual: &str) -> Result<(), VerificationMismatch> {
    let expected = normalize(expected);
    let actual = normalize(actual);
    if expected == actual {
        return Ok(());
    }

    Err(VerificationMismatch {
        path: path.to_string(),
        diff: unified_diff(&expected, &actual, "expected", "actual"),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal,
    Delete,
    Insert,
}

/// 라인 단위 unified diff (LCS 정렬, 문맥 3줄).
pub fn unified_diff(old: &str, new: &str, old_label: &str, new_label: &str) -> String {
    let a: Vec<&str> = split_lines(old);
    let b: Vec<&str> = split_lines(new);
    let ops = align(&a, &b);

    let mut out = format!("--- {old_label}\n+++ {new_label}\n");
    for hunk in hunks(&ops) {
        let (mut old_line, mut new_line) = (hunk.old_start, hunk.new_start);
        let mut body = String::new();
        let (mut old_count, mut new_count) = (0usize, 0usize);

        for op in &ops[hunk.range.clone()] {
            match op {
                Op::Equal => {
                    body.push_str(&format!(" {}\n", a[old_line]));
                    old_line += 1;
                    new_line += 1;
                    old_count += 1;
                    new_count += 1;
                }
                Op::Delete => {
                    body.push_str(&format!("-{}\n", a[old_line]));
                    old_line += 1;
                    old_count += 1;
                }
                Op::Insert => {
                    body.push_str(&format!("+{}\n", b[new_line]));
                    new_line += 1;
                    new_count += 1;
                }
            }
        }

        out.push_str(&format!(
            "@@ -{} +{} @@\n",
            hunk_range(hunk.old_start, old_count),
            hunk_range(hunk.new_start, new_count)
        ));
        out.push_str(&body);
    }
    out
}

fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

fn hunk_range(start: usize, count: usize) -> String {
    // unified diff 규칙: 빈 범위는 직전 라인 번호를 쓴다.
    let first = if count == 0 { start } else { start + 1 };
    if count == 1 {
        first.to_string()
    } else {
        format!("{first},{count}")
    }
}

/// 공통 앞/뒤 라인을 먼저 떼고, 남은 구간만 LCS로 정렬한다.
fn align(a: &[&str], b: &[&str]) -> Vec<Op> {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mut ops = vec![Op::Equal; prefix];
    ops.extend(align_middle(
        &a[prefix..a.len() - suffix],
        &b[prefix..b.len() - suffix],
    ));
    ops.extend(std::iter::repeat_n(Op::Equal, suffix));
    ops
}

/// LCS 테이블 정렬. 테이블이 상한을 넘으면 전체 삭제 후 전체 추가로 낸다.
fn align_middle(a: &[&str], b: &[&str]) -> Vec<Op> {
    let (m, n) = (a.len(), b.len());
    if m == 0 || n == 0 || (m + 1).saturating_mul(n + 1) > MAX_TABLE_CELLS {
        let mut ops = vec![Op::Delete; m];
        ops.extend(std::iter::repeat_n(Op::Insert, n));
        return ops;
    }

    let mut table = vec![vec![0u32; n + 1]; m + 1];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            table[i][j] = if a[i] == b[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(m + n);
    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        if a[i] == b[j] {
            ops.push(Op::Equal);
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            ops.push(Op::Delete);
            i += 1;
        } else {
            ops.push(Op::Insert);
            j += 1;
        }
    }
    ops.extend(std::iter::repeat_n(Op::Delete, m - i));
    ops.extend(std::iter::repeat_n(Op::Insert, n - j));
    ops
}

struct Hunk {
    range: std::ops::Range<usize>,
    old_start: usize,
    new_start: usize,
}

/// 변경 구간을 문맥 라인과 함께 묶는다. 문맥이 겹치는 구간은 하나로 합친다.
fn hunks(ops: &[Op]) -> Vec<Hunk> {
    let changed: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| **op != Op::Equal)
        .map(|(idx, _)| idx)
        .collect();

    let mut ranges: Vec<std::ops::Range<usize>> = Vec::new();
    for idx in changed {
        let start = idx.saturating_sub(CONTEXT_LINES);
        let end = (idx + CONTEXT_LINES + 1).min(ops.len());
        match ranges.last_mut() {
            Some(last) if start <= last.end => last.end = last.end.max(end),
            _ => ranges.push(start..end),
        }
    }

    ranges
        .into_iter()
        .map(|range| {
            let (old_start, new_start) = ops[..range.start].iter().fold((0, 0), |(o, n), op| {
                match op {
                    Op::Equal => (o + 1, n + 1),
                    Op::Delete => (o + 1, n),
                    Op::Insert => (o, n + 1),
                }
            });
            Hunk {
                range,
                old_start,
                new_start,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_newlines_and_crlf_are_ignored() {
        assert!(compare("/p", "a\nb\n", "a\nb").is_ok());
        assert!(compare("/p", "a\nb", "a\r\nb\r\n\n\n").is_ok());
        assert_eq!(normalize("x\n\n"), "x");
    }

    #[test]
    fn leading_whitespace_is_significant() {
        assert!(compare("/p", "a", "\na").is_err());
        assert!(compare("/p", "a b", "a  b").is_err());
    }

    #[test]
    fn mismatch_diff_identifies_changed_line() {
        let expected = "# Databricks notebook source\nx = 1\ny = 2\nz = 3\n";
        let actual = "# Databricks notebook source\nx = 1\ny = 20\nz = 3\n";

        let err = compare("/Users/a/nb", expected, actual).unwrap_err();
        assert_eq!(err.path, "/Users/a/nb");
        assert_eq!(
            err.diff,
            "--- expected\n+++ actual\n@@ -1,4 +1,4 @@\n \
             # Databricks notebook source\n x = 1\n-y = 2\n+y = 20\n z = 3\n"
        );
    }

    #[test]
    fn truncated_write_shows_missing_lines() {
        let expected: String = (1..=10).map(|i| format!("line {i}\n")).collect();
        let actual: String = (1..=6).map(|i| format!("line {i}\n")).collect();

        let err = compare("/p", &expected, &actual).unwrap_err();
        assert!(err.diff.contains("@@ -4,7 +4,3 @@\n"));
        assert!(err.diff.contains("-line 7\n-line 8\n-line 9\n-line 10\n"));
        assert!(!err.diff.contains("+line"));
    }

    #[test]
    fn empty_actual_is_a_mismatch() {
        let err = compare("/p", "a\nb", "").unwrap_err();
        assert!(err.diff.contains("@@ -1,2 +0,0 @@\n-a\n-b\n"));
    }

    #[test]
    fn large_truncation_aligns_only_the_missing_tail() {
        let expected: String = (1..=20_000).map(|i| format!("line {i}\n")).collect();
        let actual: String = (1..=10_000).map(|i| format!("line {i}\n")).collect();

        let err = compare("/p", &expected, &actual).unwrap_err();
        assert!(err.diff.contains("@@ -9998,10003 +9998,3 @@\n line 9998\n"));
        assert!(err.diff.ends_with("-line 20000\n"));
    }

    #[test]
    fn oversized_rewrite_falls_back_to_delete_then_insert() {
        let old: Vec<String> = (0..3_000).map(|i| format!("a{i}")).collect();
        let new: Vec<String> = (0..3_000).map(|i| format!("b{i}")).collect();

        let diff = unified_diff(&old.join("\n"), &new.join("\n"), "expected", "actual");
        assert!(diff.starts_with("--- expected\n+++ actual\n@@ -1,3000 +1,3000 @@\n-a0\n"));
        let removed = diff.lines().filter(|l| l.starts_with("-a")).count();
        let added = diff.lines().filter(|l| l.starts_with("+b")).count();
        assert_eq!((removed, added), (3_000, 3_000));
    }

    #[test]
    fn distant_changes_produce_separate_hunks() {
        let expected: String = (1..=20).map(|i| format!("{i}\n")).collect();
        let actual = expected.replace("2\n3\n", "2\nthree\n").replace("18\n", "eighteen\n");

        let diff = unified_diff(&normalize(&expected), &normalize(&actual), "a", "b");
        assert_eq!(diff.matches("@@ -").count(), 2);
    }
}
