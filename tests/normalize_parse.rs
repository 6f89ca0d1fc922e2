use serde_json::{Value, json};
use tessy::normalize::{BOX_HEADER, boxes_to_map, osd_to_map, tabular_to_map};

const TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t
5\t1\t1\t1\t1\t1\t36\t92\t60\t24\t96.063751\tHello
5\t1\t1\t1\t1\t2\t104\t92\t70\t24\t95.89\tworld
";

fn cell_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[test]
fn tsv_header_becomes_keys_with_parallel_columns() {
    let map = tabular_to_map(TSV, '\t');
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, TSV.lines().next().unwrap().split('\t').collect::<Vec<_>>());
    for column in map.values() {
        assert_eq!(column.as_array().unwrap().len(), 3);
    }
    assert_eq!(map["left"], json!([0, 36, 104]));
    assert_eq!(map["conf"], json!(["-1", "96.063751", "95.89"]));
    assert_eq!(map["text"], json!(["", "Hello", "world"]));
}

#[test]
fn tsv_rows_can_be_rebuilt_from_columns() {
    let map = tabular_to_map(TSV, '\t');
    let rows = map.values().next().unwrap().as_array().unwrap().len();
    let header: Vec<&str> = map.keys().map(String::as_str).collect();
    let mut rebuilt = vec![header.join("\t")];
    for i in 0..rows {
        let cells: Vec<String> = map.values().map(|c| cell_text(&c[i])).collect();
        rebuilt.push(cells.join("\t"));
    }
    assert_eq!(rebuilt, TSV.lines().collect::<Vec<_>>());
}

#[test]
fn ragged_rows_are_padded() {
    let map = tabular_to_map("a\tb\tc\n1\t2\n\n3\t4\t5\t6\n", '\t');
    assert_eq!(map["a"], json!([1, 3]));
    assert_eq!(map["c"], json!(["", 5]));
}

#[test]
fn all_empty_rows_are_kept() {
    let content = "a\tb\tc\n1\t2\t3\n\t\t\n4\t5\t6";
    let map = tabular_to_map(content, '\t');
    assert_eq!(map["a"], json!([1, "", 4]));
    assert_eq!(map["c"], json!([3, "", 6]));
}

#[test]
fn box_lines_get_synthetic_header() {
    let map = boxes_to_map("H 36 364 52 388 0\ni 55 364 60 388 0\n");
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, BOX_HEADER);
    assert_eq!(map["char"], json!(["H", "i"]));
    assert_eq!(map["bottom"], json!([364, 364]));
    assert_eq!(map["page"], json!([0, 0]));
}

#[test]
fn empty_box_output_still_has_header_keys() {
    let map = boxes_to_map("");
    assert_eq!(map.len(), BOX_HEADER.len());
    assert!(map.values().all(|v| v.as_array().is_some_and(Vec::is_empty)));
}

#[test]
fn osd_values_are_coerced() {
    let map = osd_to_map(
        "Page number: 0\nOrientation in degrees: 270\nRotate: 90\n\
         Orientation confidence: 71.00\nScript: Latin\nScript confidence: nan\n",
    );
    assert_eq!(map["page_number"], json!(0));
    assert_eq!(map["orientation_in_degrees"], json!(270));
    assert_eq!(map["rotate"], json!(90));
    assert_eq!(map["orientation_confidence"], json!(71.0));
    assert_eq!(map["script"], json!("Latin"));
    assert_eq!(map["script_confidence"], Value::Null);
}

#[test]
fn osd_lines_without_separator_are_skipped() {
    let map = osd_to_map("Warning. Invalid resolution 0 dpi.\nRotate: 0\n");
    assert_eq!(map.len(), 1);
    assert_eq!(map["rotate"], json!(0));
}

#[cfg(feature = "hocr")]
#[test]
fn hocr_becomes_nested_map() {
    let hocr = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en" lang="en">
 <head>
  <title></title>
  <meta http-equiv="Content-Type" content="text/html;charset=utf-8"/>
  <meta name='ocr-system' content='tesseract 5.3.0' />
 </head>
 <body>
  <div class='ocr_page' id='page_1' title='bbox 0 0 640 480; ppageno 0'>
   <span class='ocrx_word' id='word_1_1' title='bbox 36 92 96 116; x_wconf 96'>Hello</span>
   <span class='ocrx_word' id='word_1_2' title='bbox 104 92 174 116; x_wconf 95'>world &amp; co</span>
  </div>
 </body>
</html>
"#;
    let map = tessy::normalize::hocr_to_map(hocr).unwrap();
    let html = &map["html"];
    assert_eq!(html["@lang"], json!("en"));
    assert_eq!(html["head"]["title"], Value::Null);
    assert_eq!(html["head"]["meta"].as_array().unwrap().len(), 2);

    let spans = html["body"]["div"]["span"].as_array().unwrap();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0]["@class"], json!("ocrx_word"));
    assert_eq!(spans[0]["#text"], json!("Hello"));
    assert_eq!(spans[1]["#text"], json!("world & co"));
    assert_eq!(html["body"]["div"]["@id"], json!("page_1"));
}

#[cfg(feature = "hocr")]
#[test]
fn malformed_hocr_is_an_error() {
    let err = tessy::normalize::hocr_to_map("<html><body></html>").unwrap_err();
    assert!(matches!(err, tessy::Error::Markup(_)));
}
