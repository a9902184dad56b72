//! Wiki markup to [`ItemRecord`] conversion.
//!
//! The data page is a long run of `{{Gem store entry ... }}` template calls,
//! usually with one `| key = value` parameter per line. Everything else on the
//! page (other templates, prose, comments) is skipped.

use thiserror::Error;

use crate::record::{ItemRecord, RecordFields};

pub const ENTRY_TEMPLATE: &str = "Gem store entry";

const BLOCK_OPEN: &str = "{{";
const BLOCK_CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupParseError {
    #[error("page content is empty")]
    EmptyPage,
}

/// Parses every entry block on the page, in page order.
///
/// Malformed parameters (no `=`) are skipped; the rest of the block still
/// produces a record. A line that does not start a parameter continues the
/// previous parameter's value.
pub fn parse_markup(raw: &str) -> Result<Vec<ItemRecord>, MarkupParseError> {
    if raw.trim().is_empty() {
        return Err(MarkupParseError::EmptyPage);
    }

    let records = raw
        .split(BLOCK_OPEN)
        .filter_map(parse_block)
        .collect::<Vec<_>>();
    Ok(records)
}

fn parse_block(segment: &str) -> Option<ItemRecord> {
    let body = segment
        .split_once(BLOCK_CLOSE)
        .map_or(segment, |(inner, _)| inner);
    let tag_end = body.find(['|', '\n']).unwrap_or(body.len());
    let (tag, params) = body.split_at(tag_end);
    if !is_entry_tag(tag) {
        return None;
    }

    let mut fields = RecordFields::default();
    let mut pending: Option<String> = None;
    for line in params.lines() {
        let mut pieces = split_params(line).into_iter();
        if let (Some(text), Some(param)) = (pieces.next(), pending.as_mut()) {
            param.push_str(text.trim());
        }
        for piece in pieces {
            if let Some(done) = pending.replace(piece.trim().to_string()) {
                apply_param(&mut fields, &done);
            }
        }
    }
    if let Some(done) = pending {
        apply_param(&mut fields, &done);
    }

    Some(fields.build())
}

fn apply_param(fields: &mut RecordFields, param: &str) {
    if let Some((key, value)) = param.split_once('=') {
        fields.set(key.trim(), value.trim());
    }
}

/// Splits a line on `|` outside of `[[...]]` links. The first piece is the
/// text before any parameter starts on this line.
fn split_params(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'[', Some(b'[')) => {
                depth += 1;
                i += 2;
                continue;
            }
            (b']', Some(b']')) => {
                depth = depth.saturating_sub(1);
                i += 2;
                continue;
            }
            (b'|', _) if depth == 0 => {
                pieces.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    pieces.push(&line[start..]);
    pieces
}

/// Template names compare like MediaWiki does: outer whitespace and `_` vs
/// space are insignificant, and so is the case of the first letter.
fn is_entry_tag(tag: &str) -> bool {
    let normalized = tag.trim().replace('_', " ");
    let mut actual = normalized.chars();
    let mut expected = ENTRY_TEMPLATE.chars();
    match (actual.next(), expected.next()) {
        (Some(a), Some(e)) if a.to_lowercase().eq(e.to_lowercase()) => {
            actual.as_str() == expected.as_str()
        }
        _ => false,
    }
}
