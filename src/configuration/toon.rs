//! Line-oriented, indentation-sensitive structured-text parser.
//!
//! The scenario script syntax is a small structured-text dialect:
//!
//! ```text
//! # comment lines and blanks are ignored
//! engine:
//!   coherence: true
//! metadata:
//!   - start: 0.0
//!     narrative: the field warms slowly
//!     timeline:
//!       - at: 1.5
//!         ambient:
//!           temperature: 0.7
//!           stress: 0.5
//!         overrides[1]{name,temperature,stress,mass}:
//!           rage,0.92,0.40,1.10
//!         highlight[2]: 4, 9
//! ```
//!
//! Supported forms: nested mappings (`key:` + deeper block), scalar entries
//! (`key: value`), sequences (`- item`, where an item may open a mapping),
//! inline scalar arrays (`key[n]: v1, v2`, count-checked), and tables
//! (`key[n]{h1,h2,...}:` followed by exactly n comma-separated rows,
//! field-count-checked). Parsing never mutates anything outside the returned
//! [`Value`] tree; all failures carry the offending line.

use thiserror::Error;

/// Parsed value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(String),
    Sequence(Vec<Value>),
    /// Key/value pairs in document order.
    Mapping(Vec<(String, Value)>),
    Table(Table),
}

/// A list-of-records table: headers from the declaration, rows as raw
/// comma-split fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of a header column, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

impl Value {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Mapping lookup by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping()
            .and_then(|m| m.iter().find(|(k, _)| k == key).map(|(_, v)| v))
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: tabs are not allowed in indentation")]
    Tabs { line: usize },
    #[error("line {line}: unexpected indentation")]
    Indent { line: usize },
    #[error("line {line}: expected a `key: value` entry")]
    ExpectedEntry { line: usize },
    #[error("line {line}: expected a `- ` sequence item")]
    ExpectedItem { line: usize },
    #[error("line {line}: malformed declaration `{text}`")]
    Malformed { line: usize, text: String },
    #[error("line {line}: duplicate key `{key}`")]
    DuplicateKey { line: usize, key: String },
    #[error("line {line}: `{key}` declares {expected} values but {found} were found")]
    CountMismatch {
        line: usize,
        key: String,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: row has {found} fields but table `{key}` lists {expected} headers")]
    FieldMismatch {
        line: usize,
        key: String,
        expected: usize,
        found: usize,
    },

    // Shape errors raised by typed extraction on top of the value tree.
    #[error("`{key}`: missing required entry")]
    Missing { key: String },
    #[error("`{key}`: expected {expected}")]
    Shape {
        key: String,
        expected: &'static str,
    },
    #[error("`{key}`: not a number: `{value}`")]
    NotANumber { key: String, value: String },
    #[error("`{key}`: expected true or false, got `{value}`")]
    NotABool { key: String, value: String },
}

/// One significant source line.
struct Line<'a> {
    number: usize,
    indent: usize,
    text: &'a str,
}

/// Parse a whole document. An empty document is an empty mapping.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    let lines = scan(input)?;
    if lines.is_empty() {
        return Ok(Value::Mapping(Vec::new()));
    }
    let mut pos = 0;
    let value = parse_block(&lines, &mut pos)?;
    if pos < lines.len() {
        return Err(ParseError::Indent {
            line: lines[pos].number,
        });
    }
    Ok(value)
}

/// Strip blanks and comment lines, measure indentation.
fn scan(input: &str) -> Result<Vec<Line<'_>>, ParseError> {
    let mut lines = Vec::new();
    for (i, raw) in input.lines().enumerate() {
        let number = i + 1;
        let stripped = raw.trim_end();
        let body = stripped.trim_start();
        if body.is_empty() || body.starts_with('#') {
            continue;
        }
        let leading = &stripped[..stripped.len() - body.len()];
        if leading.contains('\t') {
            return Err(ParseError::Tabs { line: number });
        }
        lines.push(Line {
            number,
            indent: leading.len(),
            text: body,
        });
    }
    Ok(lines)
}

fn parse_block(lines: &[Line<'_>], pos: &mut usize) -> Result<Value, ParseError> {
    let indent = lines[*pos].indent;
    if lines[*pos].text.starts_with('-') {
        parse_sequence(lines, pos, indent)
    } else {
        parse_mapping(lines, pos, indent)
    }
}

fn parse_mapping(lines: &[Line<'_>], pos: &mut usize, indent: usize) -> Result<Value, ParseError> {
    let mut entries: Vec<(String, Value)> = Vec::new();
    while *pos < lines.len() {
        let line = &lines[*pos];
        if line.indent != indent || line.text.starts_with('-') {
            break;
        }
        *pos += 1;
        let (key, value) = parse_entry(lines, pos, indent, line.text, line.number)?;
        if entries.iter().any(|(k, _)| *k == key) {
            return Err(ParseError::DuplicateKey {
                line: line.number,
                key,
            });
        }
        entries.push((key, value));
    }
    // Anything left deeper than this block is a stray indent.
    if *pos < lines.len() && lines[*pos].indent > indent {
        return Err(ParseError::Indent {
            line: lines[*pos].number,
        });
    }
    Ok(Value::Mapping(entries))
}

fn parse_sequence(lines: &[Line<'_>], pos: &mut usize, indent: usize) -> Result<Value, ParseError> {
    let mut items = Vec::new();
    while *pos < lines.len() {
        let line = &lines[*pos];
        if line.indent != indent || !line.text.starts_with('-') {
            break;
        }
        if line.text != "-" && !line.text.starts_with("- ") {
            return Err(ParseError::ExpectedItem { line: line.number });
        }
        let rest = line.text[1..].trim_start();
        *pos += 1;

        if rest.is_empty() {
            // Bare dash: the item is the following deeper block.
            if *pos < lines.len() && lines[*pos].indent > indent {
                items.push(parse_block(lines, pos)?);
            } else {
                return Err(ParseError::Malformed {
                    line: line.number,
                    text: line.text.to_string(),
                });
            }
        } else if is_inline_entry(rest) {
            // The item opens a mapping whose first entry sits on the dash
            // line; continuation entries follow at a fixed deeper indent.
            let (key, value) = parse_entry(lines, pos, indent, rest, line.number)?;
            let mut entries = vec![(key, value)];
            if *pos < lines.len()
                && lines[*pos].indent > indent
                && !lines[*pos].text.starts_with('-')
            {
                let item_indent = lines[*pos].indent;
                while *pos < lines.len() {
                    let l = &lines[*pos];
                    if l.indent != item_indent || l.text.starts_with('-') {
                        break;
                    }
                    *pos += 1;
                    let (k, v) = parse_entry(lines, pos, item_indent, l.text, l.number)?;
                    if entries.iter().any(|(e, _)| *e == k) {
                        return Err(ParseError::DuplicateKey {
                            line: l.number,
                            key: k,
                        });
                    }
                    entries.push((k, v));
                }
            }
            if *pos < lines.len() && lines[*pos].indent > indent {
                return Err(ParseError::Indent {
                    line: lines[*pos].number,
                });
            }
            items.push(Value::Mapping(entries));
        } else {
            // Plain scalar item.
            if *pos < lines.len() && lines[*pos].indent > indent {
                return Err(ParseError::Indent {
                    line: lines[*pos].number,
                });
            }
            items.push(Value::Scalar(rest.to_string()));
        }
    }
    Ok(Value::Sequence(items))
}

/// `key: value`-shaped text: a colon with a whitespace-free key ahead of it
/// and either end-of-line or a space after it.
fn is_inline_entry(text: &str) -> bool {
    match text.find(':') {
        Some(c) if c > 0 => {
            let key_ok = !text[..c].contains(char::is_whitespace);
            let after_ok = c + 1 == text.len() || text.as_bytes()[c + 1] == b' ';
            key_ok && after_ok
        }
        _ => false,
    }
}

/// Parse one mapping entry whose head line was already consumed. Nested
/// blocks, inline arrays, and table rows are read from `lines` at an indent
/// deeper than `entry_indent`.
fn parse_entry(
    lines: &[Line<'_>],
    pos: &mut usize,
    entry_indent: usize,
    text: &str,
    line_number: usize,
) -> Result<(String, Value), ParseError> {
    let colon = text.find(':').ok_or(ParseError::ExpectedEntry { line: line_number })?;
    let head = text[..colon].trim_end();
    let rest = text[colon + 1..].trim();
    if head.is_empty() {
        return Err(ParseError::ExpectedEntry { line: line_number });
    }

    let Some(bracket) = head.find('[') else {
        // Plain entry: scalar or nested block.
        let key = head.to_string();
        if !rest.is_empty() {
            return Ok((key, Value::Scalar(rest.to_string())));
        }
        if *pos < lines.len() && lines[*pos].indent > entry_indent {
            let value = parse_block(lines, pos)?;
            return Ok((key, value));
        }
        return Ok((key, Value::Scalar(String::new())));
    };

    // `key[n]` declarations: inline array or table.
    let key = head[..bracket].trim();
    let after = &head[bracket + 1..];
    let malformed = || ParseError::Malformed {
        line: line_number,
        text: text.to_string(),
    };
    if key.is_empty() {
        return Err(malformed());
    }
    let close = after.find(']').ok_or_else(malformed)?;
    let count: usize = after[..close].trim().parse().map_err(|_| malformed())?;
    let tail = after[close + 1..].trim();

    if tail.is_empty() {
        // Inline scalar array: `key[n]: v1, v2, ...`
        let values: Vec<Value> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',')
                .map(|v| Value::Scalar(v.trim().to_string()))
                .collect()
        };
        if values.len() != count {
            return Err(ParseError::CountMismatch {
                line: line_number,
                key: key.to_string(),
                expected: count,
                found: values.len(),
            });
        }
        Ok((key.to_string(), Value::Sequence(values)))
    } else if tail.starts_with('{') && tail.ends_with('}') {
        // Table: `key[n]{h1,h2,...}:` followed by n deeper rows.
        if !rest.is_empty() {
            return Err(malformed());
        }
        let headers: Vec<String> = tail[1..tail.len() - 1]
            .split(',')
            .map(|h| h.trim().to_string())
            .collect();
        let mut rows = Vec::new();
        while *pos < lines.len() && lines[*pos].indent > entry_indent && rows.len() < count {
            let row_line = &lines[*pos];
            *pos += 1;
            let fields: Vec<String> = row_line
                .text
                .split(',')
                .map(|f| f.trim().to_string())
                .collect();
            if fields.len() != headers.len() {
                return Err(ParseError::FieldMismatch {
                    line: row_line.number,
                    key: key.to_string(),
                    expected: headers.len(),
                    found: fields.len(),
                });
            }
            rows.push(fields);
        }
        if rows.len() != count {
            return Err(ParseError::CountMismatch {
                line: line_number,
                key: key.to_string(),
                expected: count,
                found: rows.len(),
            });
        }
        Ok((key.to_string(), Value::Table(Table { headers, rows })))
    } else {
        Err(malformed())
    }
}
