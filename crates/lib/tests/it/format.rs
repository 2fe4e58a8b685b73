//! Whole-document behaviour of the parser and writer.

use seria::{
    Node,
    format::{self, FormatOptions, LineEnding},
    node::Value,
};

use crate::helpers::{DESIGN, SAVE, layout};

const THREE_LEVELS: &str = "Root 1\n{\n\tm_id=1\n\tm_a=1\n\tm_children Child 2\n\t{\n\t\tm_id=2\n\t\tm_b=2\n\t}\n}\n";

#[test]
fn test_set_then_reparse_three_levels() {
    let mut root = format::parse(THREE_LEVELS).unwrap();
    let child_before = root.children_by_code(2)[0].clone();

    root.set("m_a", 9).unwrap();
    let text = format::write(&root);
    assert_eq!(text, THREE_LEVELS.replace("m_a=1", "m_a=9"));

    let reparsed = format::parse(&text).unwrap();
    assert_eq!(reparsed.get("m_a").unwrap(), Some(&Value::Int(9)));
    assert_eq!(reparsed.children_by_code(2)[0], &child_before);
    assert_eq!(layout(&reparsed), vec!["m_id", "m_a", "m_children/2"]);
}

#[test]
fn test_untouched_documents_round_trip() {
    let documents = [
        DESIGN,
        SAVE,
        THREE_LEVELS,
        // byte order mark, CRLF, braces on the header line, odd spacing
        "\u{feff}Ship  7 {\r\n   m_a=01\r\n\r\n\r\n   m_ok=TRUE\r\n  m_children   Frame 31\r\n\r\n  {\r\n  }\r\n}\r\n\r\n",
        // values are kept verbatim, including '=' and braces after the first '='
        "Root 1\n{\n  m_expr=a=b {c}\n  m_q=\"quoted \\\" text\"\n  m_f=1.500\n  m_neg=-0\n  m_big=99999999999999999999\n}",
        // closing braces directly after an opening or closing brace
        "Root 1 {\nm_children Child 2 {\nm_children Leaf 3 {}}}",
        // no trailing newline and no entries
        "Empty 0\n{\n}",
    ];

    for text in documents {
        let root = format::parse(text).unwrap();
        assert_eq!(format::write(&root), text, "round trip of {text:?}");
    }
}

#[test]
fn test_scalar_classification_of_parsed_values() {
    let root = format::parse(
        "Root 1\n{\n\tm_i=-12\n\tm_f=0.25\n\tm_b=False\n\tm_s=COMBRIDGE\n\tm_q=\"a b\"\n\tm_big=99999999999999999999\n}\n",
    )
    .unwrap();

    assert_eq!(root.get_as::<i64>("m_i").unwrap(), Some(-12));
    assert_eq!(root.get_as::<f64>("m_f").unwrap(), Some(0.25));
    assert_eq!(root.get_as::<bool>("m_b").unwrap(), Some(false));
    assert_eq!(root.get_as::<&str>("m_s").unwrap(), Some("COMBRIDGE"));
    assert_eq!(root.get_as::<&str>("m_q").unwrap(), Some("a b"));
    assert!(matches!(root.get("m_big").unwrap(), Some(Value::Float(_))));
}

#[test]
fn test_rewrite_is_stable() {
    let mut root = format::parse(DESIGN).unwrap();
    root.set("m_name", "FRIGATE").unwrap();
    root.set("m_speed", 1.25).unwrap();
    root.set("m_locked", true).unwrap();
    root.push_child("m_weapons", Node::new("Gun", 98));
    root.remove("m_id").unwrap();

    let first = format::write(&root);
    let second = format::write(&format::parse(&first).unwrap());
    assert_eq!(first, second);
    assert_eq!(format::parse(&first).unwrap(), root);
}

#[test]
fn test_canonical_values() {
    let mut root = Node::new("Root", 1);
    root.set("m_f", 0.1).unwrap();
    root.set("m_whole", 2.0).unwrap();
    root.set("m_b", false).unwrap();
    root.set("m_s", "two words").unwrap();
    root.set("m_empty", "").unwrap();

    let text = format::write(&root);
    let reparsed = format::parse(&text).unwrap();
    assert_eq!(reparsed, root);
    assert!(text.contains("\tm_f=0.1\n"));
    assert!(text.contains("\tm_b=false\n"));

    // floats that look whole stay floats
    assert!(matches!(reparsed.get("m_whole").unwrap(), Some(Value::Float(_))));
}

#[test]
fn test_write_with_options() {
    let root = format::parse(THREE_LEVELS).unwrap();
    let mut fresh = Node::new("Root", 1);
    fresh.set("m_a", 1).unwrap();
    fresh.push_child("m_children", Node::new("Child", 2));

    let options = FormatOptions {
        indent: "  ".to_string(),
        line_ending: LineEnding::CrLf,
    };
    assert_eq!(
        format::write_with(&fresh, &options),
        "Root 1\r\n{\r\n  m_a=1\r\n  m_children Child 2\r\n  {\r\n  }\r\n}\r\n"
    );

    // retained layout wins over the options
    assert_eq!(format::write_with(&root, &options), THREE_LEVELS);
}

#[test]
fn test_malformed_documents() {
    let cases = [
        ("", 1),
        ("Root 1\n{\n", 2),
        ("Root x\n{\n}\n", 1),
        ("Root 1\n{\n\tm_a=1\n\tnot a header\n}\n", 4),
        ("Root 1\n{\n\tm_a=1 }\n", 2),
        ("Root 1\n{\n}\ntrailing\n", 4),
        // the inner block closes, the root does not
        ("Root 1\n{\n\tm_children Child 2\n\t{\n\t\tm_b=1\n}\n", 2),
    ];

    for (text, line) in cases {
        let err = format::parse(text).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.line(), line, "line of error in {text:?}");

        let err: seria::Error = err.into();
        assert!(err.is_malformed());
        assert_eq!(err.module(), "format");
    }
}
