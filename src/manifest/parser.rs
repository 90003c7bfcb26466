// pdfimages -list 出力パーサ: ヘッダ行の列名で値を引き当てる
//
// page   num  type   width height color comp bpc  enc interp  object ID x-ppi y-ppi size ratio
// --------------------------------------------------------------------------------------------
//    1     0 image    2625  1688  icc     3   8  jpeg   no        72  0   300   300 45.5K 0.4%

use std::collections::HashMap;

use tracing::warn;

use crate::error::PietroError;
use crate::manifest::ManifestEntry;

/// Result of parsing an image list.
///
/// Rows that failed to parse are not fatal. They are dropped from `entries`
/// and reported in `warnings` as [`PietroError::MalformedManifestRow`].
#[derive(Debug)]
pub struct ParsedManifest {
    pub entries: Vec<ManifestEntry>,
    pub warnings: Vec<PietroError>,
}

/// `pdfimages -list` の出力を ManifestEntry の列に変換する。
///
/// 列はヘッダ名で照合するため、列の欠落や並び替えがあっても隣の列を誤読しない。
/// 空行と区切り行（`-` のみ）は読み飛ばす。ヘッダ行が空の場合のみ失敗する。
pub fn parse_image_list(text: &str) -> crate::error::Result<ParsedManifest> {
    let mut lines = text.lines().enumerate();

    let headers: Vec<&str> = match lines.next() {
        Some((_, header)) => header.split_whitespace().collect(),
        None => Vec::new(),
    };
    if headers.is_empty() {
        return Err(PietroError::EmptyManifestHeader);
    }

    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    for (idx, line) in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.chars().all(|c| c == '-') {
            continue;
        }

        let row: HashMap<&str, &str> = headers
            .iter()
            .copied()
            .zip(trimmed.split_whitespace())
            .collect();

        // 1-based line number for diagnostics
        let line_no = idx + 1;
        match parse_row(&row) {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                warn!(line = line_no, %reason, "dropping malformed manifest row");
                warnings.push(PietroError::MalformedManifestRow {
                    line: line_no,
                    reason,
                });
            }
        }
    }

    Ok(ParsedManifest { entries, warnings })
}

fn parse_row(row: &HashMap<&str, &str>) -> Result<ManifestEntry, String> {
    Ok(ManifestEntry {
        image_index: int_field(row, "num")?,
        image_type: text_field(row, "type").into(),
        width: int_field(row, "width")?,
        height: int_field(row, "height")?,
        color: text_field(row, "color"),
        object_id: int_field(row, "object")?,
        size: text_field(row, "size"),
    })
}

fn int_field(row: &HashMap<&str, &str>, column: &str) -> Result<u32, String> {
    let raw = row
        .get(column)
        .ok_or_else(|| format!("missing column '{column}'"))?;
    raw.parse()
        .map_err(|_| format!("column '{column}' is not an integer: '{raw}'"))
}

fn text_field(row: &HashMap<&str, &str>, column: &str) -> String {
    row.get(column).map(|s| s.to_string()).unwrap_or_default()
}
