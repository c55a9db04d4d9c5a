//! CSV 导出
//!
//! 所有字段 (包括表头) 强制加双引号，内嵌引号按 RFC 4180 翻倍。
//! 导出内容在内存中构建后整体返回，服务端不落盘。

use csv::{QuoteStyle, WriterBuilder};

use super::{AppError, AppResult};

/// Serialize header + rows into a CSV string with every field quoted.
pub fn to_csv(header: &[&str], rows: &[Vec<String>]) -> AppResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(header)
        .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;

    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV flush failed: {e}")))?;
    let mut out = String::from_utf8(bytes)
        .map_err(|e| AppError::internal(format!("CSV encoding failed: {e}")))?;
    // Drop the final record terminator; rows are newline-separated, not -terminated
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_quoted_including_header() {
        let out = to_csv(&["a", "b"], &[vec!["x,y".to_string(), "1".to_string()]]).unwrap();
        assert_eq!(out, "\"a\",\"b\"\n\"x,y\",\"1\"");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let out = to_csv(&["note"], &[vec!["say \"hi\"".to_string()]]).unwrap();
        assert_eq!(out, "\"note\"\n\"say \"\"hi\"\"\"");
    }

    #[test]
    fn empty_rows_yield_header_only() {
        let out = to_csv(&["a", "b"], &[]).unwrap();
        assert_eq!(out, "\"a\",\"b\"");
    }
}
