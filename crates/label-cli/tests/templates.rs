use std::io::Write;

use label_cli::inputs::{merge_directives, parse_assignments};
use label_cli::templates::{load_records, load_single_record, load_template};
use label_map::{MappingDirective, build_column_mapping, suggest_directives};
use label_model::Dpi;
use label_render::{analyze_groups, render_from_record, scan_placeholders};
use tempfile::NamedTempFile;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const TEMPLATE: &str = r#"
name = "Quant label"
root_entity = "stock.quant"
dpi = 203
width = 4
height = 2
markup = "^XA^FD${PRODUCT}^FS^FD${LOT}^FS^FD${ROW_R1}^FS^FD${ROW_R2}^FS^XZ"

[[placeholders]]
placeholder = "PRODUCT"
field_path = "product_id.name"

[[placeholders]]
placeholder = "${LOT}"
attribute = "lot_id"
through = "name"
"#;

#[test]
fn loaded_template_renders_nested_record() {
    let template_file = temp_file(TEMPLATE);
    let records_file = temp_file(
        r#"[
            {"product_id": {"name": "Hand soap"}, "lot_id": {"name": "L-7"}},
            {"product_id": {"name": "Shampoo"}, "lot_id": null}
        ]"#,
    );

    let template = load_template(template_file.path()).unwrap();
    assert_eq!(template.dpi, Some(Dpi::Dpi203));
    assert_eq!(template.bindings.len(), 4);

    let records = load_records(records_file.path()).unwrap();
    let rendered: Vec<String> = records
        .iter()
        .map(|record| render_from_record(&template, Some(record)))
        .collect();
    assert_eq!(
        rendered,
        vec![
            "^XA^FDHand soap^FS^FDL-7^FS^FD^FS^FD^FS^XZ".to_string(),
            "^XA^FDShampoo^FS^FD^FS^FD^FS^FD^FS^XZ".to_string(),
        ]
    );
}

#[test]
fn single_record_files_must_hold_one_record() {
    let two = temp_file(r#"[{"a": 1}, {"a": 2}]"#);
    assert!(load_single_record(two.path()).is_err());
    let one = temp_file(r#"{"a": 1}"#);
    assert!(load_single_record(one.path()).is_ok());
}

#[test]
fn csv_mapping_combines_suggestions_and_explicit_directives() {
    let template = load_template(temp_file(TEMPLATE).path()).unwrap();
    let grouping = analyze_groups(&scan_placeholders(&template.markup));
    let headers = vec!["Product".to_string(), "lot".to_string(), "Row".to_string()];

    let directives = merge_directives(
        suggest_directives(grouping.collapsed(), &headers),
        &["ROW=C".parse::<MappingDirective>().unwrap()],
    );
    let mapping = build_column_mapping(&headers, &directives);

    assert_eq!(mapping.get("PRODUCT"), Some(0));
    assert_eq!(mapping.get("LOT"), Some(1));
    assert_eq!(mapping.get("ROW"), Some(2));
    assert!(mapping.unmapped(&directives).is_empty());
}

#[test]
fn missing_template_reports_path() {
    let err = load_template(std::path::Path::new("/nonexistent/label.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/label.toml"));
}

#[test]
fn assignments_feed_overrides() {
    let values = parse_assignments(&["LOT=L-1".to_string(), "NOTE=a=b".to_string()]).unwrap();
    assert_eq!(values.get("LOT"), Some("L-1"));
    assert_eq!(values.get("NOTE"), Some("a=b"));
}
