//! Integration tests: source text -> parse -> extract -> render, file naming and writing,
//! and the generated fixtures under tests/fixtures.

use pbgo_trans::{
    collect_inputs, extract, parse, render, run_file, transform, Config, ExtractOptions, FieldShape, Severity,
    SkipReason,
};
use std::fs;
use std::path::{Path, PathBuf};

const ORDER_SRC: &str = "package orders\n\ntype Item struct {\n\tSku string `json:\"sku\"`\n}\n\ntype Order struct { ID string `json:\"id\"`; Items []*Item; XXX_unrecognized []byte }\n";

const SHAPES_SRC: &str = r#"package shapes

type Shapes struct {
	Plain    Item
	Pointer  *Item
	Slice    []Item
	Pointers []*Item
}
"#;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn transform_text(src: &str) -> String {
    let t = transform(src, &Config::default()).expect("transform");
    String::from_utf8(t.bytes).expect("utf-8 output")
}

// ==================== Properties ====================

#[test]
fn test_render_is_idempotent() {
    let unit = parse(ORDER_SRC).expect("parse");
    let options = ExtractOptions::default();
    let first = render(&extract(&unit, &options).structs, "orders_trans");
    let second = render(&extract(&unit, &options).structs, "orders_trans");
    assert_eq!(first, second);
}

#[test]
fn test_struct_and_field_order_preserved() {
    let src = r#"package p

type Zeta struct {
	C int
	A int
	B int
}

type Alpha struct {
	Y string
	X string
}

type (
	Mid struct {
		Q bool
	}
	Last struct{}
)
"#;
    let t = transform(src, &Config::default()).expect("transform");
    let names: Vec<&str> = t.structs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid", "Last"]);
    let fields: Vec<&str> = t.structs[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, vec!["C", "A", "B"]);

    let out = String::from_utf8(t.bytes).unwrap();
    let zeta = out.find("type Zeta struct").unwrap();
    let alpha = out.find("type Alpha struct").unwrap();
    let last = out.find("type Last struct").unwrap();
    assert!(zeta < alpha && alpha < last);
}

#[test]
fn test_unexported_structs_are_not_emitted() {
    let src = "package p\ntype visible struct{ A int }\ntype Visible struct{ A int }\ntype _hidden struct{ A int }\n";
    let t = transform(src, &Config::default()).expect("transform");
    assert_eq!(t.structs.len(), 1);
    assert_eq!(t.structs[0].name, "Visible");
    let out = String::from_utf8(t.bytes).unwrap();
    assert!(!out.contains("type visible"));
    assert!(!out.contains("_hidden"));
    let unexported = t
        .diagnostics
        .iter()
        .filter(|d| d.reason == SkipReason::UnexportedStruct)
        .count();
    assert_eq!(unexported, 2);
}

#[test]
fn test_internal_fields_dropped_regardless_of_shape() {
    let src = r#"package p

type M struct {
	XXX_NoUnkeyedLiteral struct{}          `json:"-"`
	XXX_unrecognized     []byte            `json:"-"`
	XXX_sizecache        int32             `json:"-"`
	XXX_extensions       map[int32]Ext     `json:"-"`
	XXX_ptr              *Ext
	Keep                 string            `json:"keep"`
}
"#;
    let out = transform_text(src);
    assert!(!out.contains("XXX_"), "{}", out);
    assert!(out.contains("\tKeep string `json:\"keep\"`\n"));
}

#[test]
fn test_custom_internal_prefix() {
    let src = "package p\ntype M struct {\n\tGen_cache int\n\tXXX_kept int\n}\n";
    let config = Config {
        internal_prefix: "Gen_".to_string(),
        ..Config::default()
    };
    let t = transform(src, &config).expect("transform");
    let names: Vec<&str> = t.structs[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["XXX_kept"]);
}

#[test]
fn test_type_shapes_round_trip() {
    let t = transform(SHAPES_SRC, &Config::default()).expect("transform");
    let shapes: Vec<&FieldShape> = t.structs[0].fields.iter().map(|f| &f.shape).collect();
    assert_eq!(
        shapes,
        vec![
            &FieldShape::Named("Item".into()),
            &FieldShape::PointerToNamed("Item".into()),
            &FieldShape::SliceOfNamed("Item".into()),
            &FieldShape::SliceOfPointerToNamed("Item".into()),
        ]
    );
    let out = String::from_utf8(t.bytes).unwrap();
    assert!(out.contains("\tPlain Item\n"));
    assert!(out.contains("\tPointer *Item\n"));
    assert!(out.contains("\tSlice []Item\n"));
    assert!(out.contains("\tPointers []*Item\n"));
}

#[test]
fn test_unsupported_shape_is_tolerated() {
    let src = "package p\ntype M struct {\n\tA string\n\tLabels map[string]string\n\tB *Item\n}\n";
    let t = transform(src, &Config::default()).expect("unsupported shape must not fail");
    let names: Vec<&str> = t.structs[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(t.diagnostics.len(), 1);
    let d = &t.diagnostics[0];
    assert_eq!(d.severity(), Severity::Warning);
    assert_eq!(d.field.as_deref(), Some("Labels"));
    assert_eq!(
        d.reason,
        SkipReason::UnsupportedShape {
            type_text: "map[string]string".to_string()
        }
    );
    assert_eq!(d.position.line, 4);
}

#[test]
fn test_generic_struct_is_skipped_with_warning() {
    let src = "package p\ntype Box[T any] struct {\n\tV T `json:\"v\"`\n}\n";
    let t = transform(src, &Config::default()).expect("transform");
    assert!(t.structs.is_empty());
    assert_eq!(String::from_utf8(t.bytes).unwrap(), "package p_trans\n\n");
    assert_eq!(t.diagnostics.len(), 1);
    assert_eq!(t.diagnostics[0].reason, SkipReason::GenericStruct);
    assert_eq!(t.diagnostics[0].severity(), Severity::Warning);
}

#[test]
fn test_empty_fallback_package_still_names_package() {
    let structs = extract(&parse(ORDER_SRC).expect("parse"), &ExtractOptions::default()).structs;
    let out = String::from_utf8(render(&structs, "")).unwrap();
    assert!(out.starts_with("package hello\n\n"), "{}", out);
}

#[test]
fn test_order_item_end_to_end() {
    let out = transform_text(ORDER_SRC);
    assert_eq!(
        out,
        "package orders_trans\n\ntype Item struct {\n\tSku string `json:\"sku\"`\n}\n\ntype Order struct {\n\tID string `json:\"id\"`\n\tItems []*Item\n}\n\n"
    );
}

#[test]
fn test_parse_failure_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("broken.pb.go");
    fs::write(&input, "package broken\ntype A struct {\n\tB int\n").expect("seed");
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).expect("out dir");

    let err = run_file(&input, &out_dir, &Config::default()).unwrap_err();
    assert!(err.is_parse(), "{}", err);
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
}

// ==================== Files ====================

#[test]
fn test_run_file_writes_next_to_out_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("orders.pb.go");
    fs::write(&input, ORDER_SRC).expect("seed");
    let out_dir = dir.path().join("gen");
    fs::create_dir(&out_dir).expect("out dir");

    let outcome = run_file(&input, &out_dir, &Config::default()).expect("run");
    assert_eq!(outcome.output, out_dir.join("orders.go"));
    let written = fs::read_to_string(&outcome.output).expect("output");
    assert_eq!(written.as_bytes(), outcome.transformed.bytes.as_slice());
    assert!(written.starts_with("package orders_trans\n\n"));
}

#[test]
fn test_run_file_missing_input_is_read_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = run_file(&dir.path().join("nope.pb.go"), dir.path(), &Config::default()).unwrap_err();
    assert!(err.is_read());
}

#[test]
fn test_run_file_refuses_to_overwrite_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    // No generator suffix: the output name equals the input name.
    let input = dir.path().join("orders.go");
    fs::write(&input, ORDER_SRC).expect("seed");

    let err = run_file(&input, dir.path(), &Config::default()).unwrap_err();
    assert!(err.is_write());
    assert_eq!(fs::read_to_string(&input).unwrap(), ORDER_SRC);
}

#[test]
fn test_empty_package_name_uses_fallback() {
    // `package _` is the closest a parsable file gets to an empty name; the
    // fallback only applies to a truly empty one.
    let config = Config::default();
    assert_eq!(config.output_package(""), "hello");
    let t = transform("package _\ntype A struct{}\n", &config).expect("transform");
    assert_eq!(t.package, "__trans");
}

#[test]
fn test_collect_inputs_expands_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in ["b.pb.go", "a.pb.go", "c.go", "notes.txt"] {
        fs::write(dir.path().join(name), "package p\n").expect("seed");
    }
    fs::create_dir(dir.path().join("nested.pb.go")).expect("dir");
    let explicit = dir.path().join("c.go");

    let inputs = collect_inputs(&[dir.path().to_path_buf(), explicit.clone()], &Config::default()).expect("collect");
    assert_eq!(
        inputs,
        vec![dir.path().join("a.pb.go"), dir.path().join("b.pb.go"), explicit]
    );
}

// ==================== Generated fixtures ====================

#[test]
fn test_legacy_generated_file() {
    let src = fs::read_to_string(fixture("legacy_orders.pb.go")).expect("fixture");
    let t = transform(&src, &Config::default()).expect("transform");
    assert_eq!(t.package, "orders_trans");
    let names: Vec<&str> = t.structs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Order", "Item", "Customer"]);

    let out = String::from_utf8(t.bytes).unwrap();
    let expected_order = "type Order struct {\n\
        \tId string `json:\"id,omitempty\"`\n\
        \tItems []*Item `json:\"items,omitempty\"`\n\
        \tStatus Status `json:\"status,omitempty\"`\n\
        \tCustomer *Customer `json:\"customer,omitempty\"`\n\
        \tNotes []string `json:\"notes,omitempty\"`\n\
        }\n";
    assert!(out.contains(expected_order), "{}", out);
    assert!(!out.contains("protobuf:"));
    assert!(!out.contains("Labels"));

    let internal = t
        .diagnostics
        .iter()
        .filter(|d| d.reason == SkipReason::InternalField)
        .count();
    assert_eq!(internal, 9);
    let warnings: Vec<_> = t
        .diagnostics
        .iter()
        .filter(|d| d.severity() == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].subject(), "Order.Labels");
}

#[test]
fn test_protoimpl_generated_file() {
    let src = fs::read_to_string(fixture("catalog.pb.go")).expect("fixture");
    let t = transform(&src, &Config::default()).expect("transform");
    assert_eq!(t.package, "catalogv1_trans");
    let names: Vec<&str> = t.structs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Product", "Product_Sku", "Product_ExternalRef", "Variant", "Money"]
    );

    let product = &t.structs[0];
    let fields: Vec<&str> = product.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        fields,
        vec!["Id", "DisplayName", "Variants", "Price", "Tags", "Source"]
    );

    let out = String::from_utf8(t.bytes).unwrap();
    assert!(out.contains("\tDisplayName string `json:\"display_name,omitempty\"`\n"));
    assert!(out.contains("\tVariants []*Variant `json:\"variants,omitempty\"`\n"));
    assert!(out.contains("\tSource isProduct_Source\n"));
    assert!(out.contains("type Product_Sku struct {\n\tSku string\n}\n"));
    assert!(out.contains("\tSizes []int32 `json:\"sizes,omitempty\"`\n"));
    assert!(!out.contains("timestamppb"));
    assert!(!out.contains("type isProduct_Source"));
    // The struct declared inside the init function body is not top-level.
    assert!(!out.contains("type x struct"));

    let unsupported: Vec<String> = t
        .diagnostics
        .iter()
        .filter(|d| matches!(d.reason, SkipReason::UnsupportedShape { .. }))
        .map(|d| d.subject())
        .collect();
    assert!(unsupported.contains(&"Product.CreatedAt".to_string()));
    assert!(unsupported.contains(&"Variant.Attributes".to_string()));
    assert!(unsupported.contains(&"Money.state".to_string()));
}

#[test]
fn test_fixture_directory_run() {
    let out_dir = tempfile::tempdir().expect("tempdir");
    let config = Config::default();
    let inputs = collect_inputs(&[fixture("")], &config).expect("collect");
    assert_eq!(inputs, vec![fixture("catalog.pb.go"), fixture("legacy_orders.pb.go")]);
    for input in &inputs {
        run_file(input, out_dir.path(), &config).expect("run");
    }
    assert!(out_dir.path().join("catalog.go").is_file());
    assert!(out_dir.path().join("legacy_orders.go").is_file());
}
