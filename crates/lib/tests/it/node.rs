//! The Node contract exercised on parsed documents.

use seria::{
    Node, format,
    node::{SplicePolicy, Value},
};

use crate::helpers::{DESIGN, SAVE, layout};

#[test]
fn test_in_place_update_and_append_in_text() {
    let mut save = format::parse(SAVE).unwrap();
    save.set("m_version", 4).unwrap();
    save.set("m_weather", "storm").unwrap();

    let text = format::write(&save);
    let expected = SAVE
        .replace("m_version=3", "m_version=4")
        .replace("\tm_time=77\n}", "\tm_time=77\n\tm_weather=storm\n}");
    assert_eq!(text, expected);
}

#[test]
fn test_slot_and_code_lookups_keep_file_order() {
    let design = format::parse(DESIGN).unwrap();
    let frame = design.children_by_slot("m_children").unwrap()[0];

    let modules = frame.children_by_code(15);
    let names: Vec<&str> = modules
        .iter()
        .map(|module| module.get_as::<&str>("m_name").unwrap().unwrap())
        .collect();
    assert_eq!(names, vec!["COMBRIDGE", "GUN"]);

    let slot_order: Vec<i64> = frame
        .children_by_slot("m_children")
        .unwrap()
        .iter()
        .map(|child| child.code())
        .collect();
    assert_eq!(slot_order, vec![15, 15]);
    assert_eq!(frame.children_by_slot("m_mesh").unwrap().len(), 1);
    assert!(frame.children_by_slot("m_nothing").unwrap().is_empty());
}

#[test]
fn test_find_by_attribute_over_document() {
    let design = format::parse(DESIGN).unwrap();

    let bridge = design.find_by_attribute("m_name", "COMBRIDGE").unwrap();
    assert_eq!(bridge.len(), 1);
    assert_eq!(bridge[0].code(), 15);

    let ids: Vec<i64> = design
        .find_by_code(47)
        .iter()
        .map(|creature| creature.id().unwrap().unwrap())
        .collect();
    assert_eq!(ids, vec![14]);

    // numeric equality crosses int and float
    assert_eq!(design.find_by_attribute("m_center.x", 4.5).unwrap().len(), 1);
    assert_eq!(design.find_by_attribute("creatureId", 9.0).unwrap().len(), 1);
}

#[test]
fn test_deep_copy_is_independent_in_both_directions() {
    let mut original = format::parse(DESIGN).unwrap();
    let mut copy = original.clone();
    assert_eq!(format::write(&copy), DESIGN);

    copy.find_first_by_code_mut(47)
        .unwrap()
        .set("m_tele_crafts", 7)
        .unwrap();
    original.remove("m_name").unwrap();

    assert_eq!(
        original.find_by_code(47)[0].get("m_tele_crafts").unwrap(),
        Some(&Value::Int(2))
    );
    assert_eq!(copy.get_as::<&str>("m_name").unwrap(), Some("BRIG"));
    assert_eq!(copy.id().unwrap(), Some(11));
}

#[test]
fn test_splice_escadras_into_save() {
    let mut save = format::parse(SAVE).unwrap();
    let mut spliced = Node::new("Escadra", 327);
    spliced.set("m_id", 502).unwrap();

    save.splice_children(
        "m_escadras",
        327,
        vec![spliced.clone()],
        SplicePolicy::BeforeFirstOfSlot,
    );
    assert_eq!(
        layout(&save),
        vec![
            "m_version",
            "m_escadras/327",
            "m_escadras/327",
            "m_escadras/327",
            "m_time"
        ]
    );
    assert_eq!(save.children_by_slot("m_escadras").unwrap()[0], &spliced);

    save.splice_children("m_escadras", 327, vec![spliced], SplicePolicy::Append);
    assert_eq!(layout(&save).last().map(String::as_str), Some("m_escadras/327"));

    // written children get the canonical layout of their new depth
    let text = format::write(&save);
    assert!(text.starts_with("World 1\n{\n\tm_version=3\n\tm_escadras Escadra 327\n\t{\n\t\tm_id=502\n\t}\n"));
    assert!(text.ends_with("\tm_escadras Escadra 327\n\t{\n\t\tm_id=502\n\t}\n}\n"));
}

#[test]
fn test_moved_child_keeps_its_text() {
    let mut save = format::parse(SAVE).unwrap();
    let escadras = save.remove_children("m_escadras");
    assert_eq!(escadras.len(), 2);
    assert_eq!(layout(&save), vec!["m_version", "m_time"]);

    save.splice_children("m_fleets", 327, escadras, SplicePolicy::Append);
    let text = format::write(&save);
    assert!(text.contains("\tm_fleets Escadra 327\n\t{\n\t\tm_id=500\n"));
    assert_eq!(format::parse(&text).unwrap(), save);
}
