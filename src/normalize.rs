//! Conversion of engine output files into bytes, text or column maps.

use crate::error::{Error, Result};
use crate::format::{DataOutput, OutputFormat};
use serde_json::Value;
use std::path::Path;

/// Insertion-ordered field map.
pub type Map = serde_json::Map<String, Value>;

/// Header prepended to box files, which carry none.
pub const BOX_HEADER: [&str; 6] = ["char", "left", "bottom", "right", "top", "page"];

/// Decoded form of one output file.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Bytes(Vec<u8>),
    Text(String),
    Dict(Map),
}

impl Record {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Record::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Map> {
        match self {
            Record::Dict(m) => Some(m),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Record::Bytes(b) => Value::from(b.clone()),
            Record::Text(s) => Value::String(s.clone()),
            Record::Dict(m) => Value::Object(m.clone()),
        }
    }
}

/// A record plus the degradation, if any, that produced it.
#[derive(Debug)]
pub struct Normalized {
    pub record: Record,
    pub degraded: Option<Error>,
}

impl From<Record> for Normalized {
    fn from(record: Record) -> Self {
        Self {
            record,
            degraded: None,
        }
    }
}

pub fn normalize(path: &Path, format: OutputFormat, mode: DataOutput) -> Result<Normalized> {
    match mode {
        DataOutput::Bytes => read_bytes(path).map(|b| Record::Bytes(b).into()),
        DataOutput::String => read_text(path).map(|s| Record::Text(s.trim().to_string()).into()),
        DataOutput::Dict => {
            let content = read_text(path)?;
            to_dict(&content, format)
        }
    }
}

fn to_dict(content: &str, format: OutputFormat) -> Result<Normalized> {
    let map = match format {
        OutputFormat::Txt => {
            let mut map = Map::new();
            map.insert("data".into(), Value::String(content.trim().to_string()));
            map
        }
        OutputFormat::Tsv => tabular_to_map(content, '\t'),
        OutputFormat::Box => boxes_to_map(content),
        OutputFormat::Osd => osd_to_map(content),
        OutputFormat::Hocr => match hocr_to_map(content) {
            Ok(map) => map,
            Err(err @ Error::MarkupUnavailable) => {
                return Ok(Normalized {
                    record: Record::Dict(Map::new()),
                    degraded: Some(err),
                });
            }
            Err(err) => return Err(err),
        },
        OutputFormat::Pdf => {
            return Err(Error::UnsupportedFormat {
                format: "pdf",
                operation: "dict conversion",
            });
        }
    };
    Ok(Record::Dict(map).into())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::io("read", path, e))
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Header row becomes the keys; each following row contributes one value per column.
///
/// Empty lines are skipped; short rows are padded with empty strings and surplus cells dropped.
pub fn tabular_to_map(content: &str, delimiter: char) -> Map {
    let mut lines = content.lines().filter(|l| !l.is_empty());
    let Some(header) = lines.next() else {
        return Map::new();
    };
    let keys: Vec<&str> = header.split(delimiter).collect();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); keys.len()];

    for line in lines {
        let mut cells = line.split(delimiter);
        for column in columns.iter_mut() {
            column.push(coerce_cell(cells.next().unwrap_or("")));
        }
    }

    let mut map = Map::new();
    for (key, column) in keys.into_iter().zip(columns) {
        map.insert(key.to_string(), Value::Array(column));
    }
    map
}

pub fn boxes_to_map(content: &str) -> Map {
    let with_header = format!("{}\n{}", BOX_HEADER.join(" "), content);
    tabular_to_map(&with_header, ' ')
}

/// `Label name: value` lines become `label_name` keys with coerced scalar values.
pub fn osd_to_map(content: &str) -> Map {
    let mut map = Map::new();
    for line in content.lines() {
        let Some((label, value)) = line.split_once(": ") else {
            continue;
        };
        let key = label.trim().to_lowercase().replace(' ', "_");
        map.insert(key, coerce_osd_value(value.trim()));
    }
    map
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Integer if the whole cell is decimal digits, otherwise the cell as-is.
fn coerce_cell(cell: &str) -> Value {
    if is_digits(cell) {
        if let Ok(n) = cell.parse::<i64>() {
            return Value::from(n);
        }
    }
    Value::String(cell.to_string())
}

fn coerce_osd_value(raw: &str) -> Value {
    if raw.contains('.') {
        return match raw.parse::<f64>() {
            Ok(f) => Value::from(f),
            Err(_) => Value::String(raw.to_string()),
        };
    }
    if is_digits(raw) {
        return coerce_cell(raw);
    }
    if raw.eq_ignore_ascii_case("nan") {
        return Value::Null;
    }
    Value::String(raw.to_string())
}

/// Nested element map: attributes as `@name`, text as `#text`, repeated children as arrays.
#[cfg(feature = "hocr")]
pub fn hocr_to_map(content: &str) -> Result<Map> {
    markup::to_map(content)
}

#[cfg(not(feature = "hocr"))]
pub fn hocr_to_map(_content: &str) -> Result<Map> {
    Err(Error::MarkupUnavailable)
}

#[cfg(feature = "hocr")]
mod markup {
    use super::Map;
    use crate::error::{Error, Result};
    use quick_xml::Reader;
    use quick_xml::events::{BytesStart, Event};
    use serde_json::Value;

    struct Node {
        name: String,
        fields: Map,
        text: String,
    }

    impl Node {
        fn open(start: &BytesStart<'_>) -> Result<Node> {
            let mut fields = Map::new();
            for attr in start.attributes() {
                let attr = attr.map_err(|e| Error::Markup(e.to_string()))?;
                let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
                let value = attr
                    .unescape_value()
                    .map_err(|e| Error::Markup(e.to_string()))?;
                fields.insert(key, Value::String(value.into_owned()));
            }
            Ok(Node {
                name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                fields,
                text: String::new(),
            })
        }

        fn into_value(mut self) -> (String, Value) {
            let text = self.text.trim().to_string();
            let value = match (self.fields.is_empty(), text.is_empty()) {
                (true, true) => Value::Null,
                (true, false) => Value::String(text),
                (false, empty) => {
                    if !empty {
                        self.fields.insert("#text".into(), Value::String(text));
                    }
                    Value::Object(self.fields)
                }
            };
            (self.name, value)
        }

        fn attach(&mut self, name: String, value: Value) {
            match self.fields.get_mut(&name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    self.fields.insert(name, value);
                }
            }
        }
    }

    pub(super) fn to_map(content: &str) -> Result<Map> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut stack = vec![Node {
            name: String::new(),
            fields: Map::new(),
            text: String::new(),
        }];

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::Markup(format!("at byte {}: {e}", reader.buffer_position()))
            })?;
            match event {
                Event::Start(start) => stack.push(Node::open(&start)?),
                Event::Empty(start) => {
                    let (name, value) = Node::open(&start)?.into_value();
                    if let Some(parent) = stack.last_mut() {
                        parent.attach(name, value);
                    }
                }
                Event::End(_) => {
                    if stack.len() < 2 {
                        return Err(Error::Markup("unbalanced closing tag".into()));
                    }
                    if let Some(node) = stack.pop() {
                        let (name, value) = node.into_value();
                        if let Some(parent) = stack.last_mut() {
                            parent.attach(name, value);
                        }
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| Error::Markup(e.to_string()))?;
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(Error::Markup("unclosed element at end of document".into()));
        }
        Ok(stack.pop().map(|root| root.fields).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tabular_pads_short_rows() {
        let map = tabular_to_map("a\tb\tc\n1\tx\n", '\t');
        assert_eq!(map["a"], json!([1]));
        assert_eq!(map["b"], json!(["x"]));
        assert_eq!(map["c"], json!([""]));
    }

    #[test]
    fn coercion_rules() {
        assert_eq!(coerce_cell("123"), json!(123));
        assert_eq!(coerce_cell("12.5"), json!("12.5"));
        assert_eq!(coerce_cell("-1"), json!("-1"));
        assert_eq!(coerce_cell(""), json!(""));
        assert_eq!(coerce_cell("99999999999999999999999"), json!("99999999999999999999999"));
        assert_eq!(coerce_osd_value("71.00"), json!(71.0));
        assert_eq!(coerce_osd_value("NaN"), Value::Null);
        assert_eq!(coerce_osd_value("Latin"), json!("Latin"));
        assert_eq!(coerce_osd_value("180"), json!(180));
        assert_eq!(coerce_osd_value("1.2.3"), json!("1.2.3"));
    }
}
