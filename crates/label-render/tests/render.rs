//! End-to-end rendering: reconcile a template, then render it from records.

use label_model::{EntityType, PathSegment, PlaceholderBinding, Template, ValueMap};
use label_render::{
    analyze_groups, reconcile_template, render_from_record, render_from_values,
    render_with_overrides, scan_placeholders,
};
use serde_json::json;

fn lot_template() -> Template {
    let mut template = Template::new(
        "lot label",
        EntityType::new("stock.lot"),
        "^XA^FO20,20^FD${LOT}^FS^FO20,60^FD${ PRODUCT }^FS^FO20,100^FD${CATEGORY}^FS^XZ",
    )
    .with_bindings(vec![
        PlaceholderBinding::unbound("LOT").with_field_path("name"),
        PlaceholderBinding::unbound("PRODUCT")
            .with_attribute("product_id")
            .with_through("default_code"),
        PlaceholderBinding::unbound("CATEGORY").with_segments(vec![
            PathSegment::relation("product_id", EntityType::new("product.product")),
            PathSegment::relation("categ_id", EntityType::new("product.category")),
            PathSegment::scalar("name"),
        ]),
    ]);
    reconcile_template(&mut template);
    template
}

#[test]
fn renders_nested_record_paths() {
    let template = lot_template();
    let record = json!({
        "name": "LOT-7",
        "product_id": {
            "display_name": "[W1] Widget",
            "default_code": "W1",
            "categ_id": {"name": "Hardware"},
        },
    });

    let zpl = render_from_record(&template, Some(&record));

    insta::assert_snapshot!(zpl, @"^XA^FO20,20^FDLOT-7^FS^FO20,60^FDW1^FS^FO20,100^FDHardware^FS^XZ");
}

#[test]
fn whitespace_wrapped_tokens_resolve_through_normalized_bindings() {
    let template = lot_template();
    assert!(scan_placeholders(&template.markup).contains(&"PRODUCT".to_string()));
    assert!(template.binding(" PRODUCT ").is_some_and(PlaceholderBinding::is_bound));
}

#[test]
fn missing_relation_blanks_only_dependent_fields() {
    let template = lot_template();
    let record = json!({"name": "LOT-8", "product_id": null});

    let zpl = render_from_record(&template, Some(&record));

    assert_eq!(zpl, "^XA^FO20,20^FDLOT-8^FS^FO20,60^FD^FS^FO20,100^FD^FS^XZ");
}

#[test]
fn overrides_fill_unresolved_fields() {
    let template = Template::new("t", EntityType::new("stock.lot"), "${LOT}|${NOTE}")
        .with_bindings(vec![PlaceholderBinding::unbound("LOT").with_field_path("name")]);
    let record = json!({"name": "LOT-9"});
    let overrides: ValueMap = [("NOTE", "keep dry")].into_iter().collect();

    assert_eq!(
        render_with_overrides(&template, Some(&record), &overrides),
        "LOT-9|keep dry"
    );
}

#[test]
fn grouped_template_renders_one_row_per_member() {
    let template = Template::new(
        "grouped",
        EntityType::new("stock.lot"),
        "${SKU_R1}:${QTY_R1};${SKU_R2}:${QTY_R2};${HEADER}",
    );
    let analysis = analyze_groups(&scan_placeholders(&template.markup));
    assert_eq!(analysis.rows_per_label(), 2);
    assert_eq!(analysis.collapsed(), ["HEADER", "QTY", "SKU"]);

    let values: ValueMap = [
        ("SKU_R1", "A"),
        ("QTY_R1", "1"),
        ("SKU_R2", "B"),
        ("QTY_R2", "2"),
        ("HEADER", "Pick"),
    ]
    .into_iter()
    .collect();
    assert_eq!(render_from_values(&template, &values), "A:1;B:2;Pick");
}
