//! Pruning, must-exist lookups and ownership re-linking on a full design.

use seria::{
    format,
    transform::{
        AllowList, ChildSelector, RelinkPlan, first_child, prune, relink, single_by_attribute,
        single_by_attribute_mut,
    },
};

use crate::helpers::{DESIGN, Sequential, layout};

#[test]
fn test_prune_keeps_attributes_and_allowed_children() {
    let mut ship = format::parse(DESIGN).unwrap();
    let allow: AllowList = ["m_children:31".parse().unwrap()].into_iter().collect();

    assert_eq!(prune(&mut ship, &allow), 1);
    assert_eq!(layout(&ship), vec!["m_id", "m_name", "m_children/31"]);

    let frame = ship.children_by_code_mut(31).pop().unwrap();
    let frame_allow = AllowList::new()
        .with(ChildSelector::slot("m_mesh"))
        .with(ChildSelector::attribute("m_name", "COMBRIDGE").unwrap());
    assert_eq!(prune(frame, &frame_allow), 1);
    assert_eq!(
        layout(frame),
        vec!["m_id", "m_center.x", "m_center.y", "m_mesh/3", "m_children/15"]
    );

    // pruning again removes nothing
    assert_eq!(prune(frame, &frame_allow), 0);

    // untouched parts still write back as they were read
    let text = format::write(&ship);
    assert!(text.contains("\t\tm_mesh Mesh 3\n\t\t{\n\t\t\tm_file=hull_a\n\t\t}\n"));
    assert!(!text.contains("GUN"));
    assert!(!text.contains("m_weapons"));
}

#[test]
fn test_relink_three_levels() {
    let mut ship = format::parse(DESIGN).unwrap();
    let plan = RelinkPlan::new([
        ChildSelector::slot_code("m_children", 31),
        ChildSelector::code(15),
        ChildSelector::code(47),
    ])
    .with_master_id(900);

    let relinked = relink(&mut ship, &plan, &mut Sequential(0)).unwrap();
    assert_eq!(relinked.owner_id, 1);
    assert_eq!(relinked.ids, vec![2, 3, 4, 5]);

    assert_eq!(ship.id().unwrap(), Some(2));
    assert_eq!(ship.master_id().unwrap(), Some(900));
    assert_eq!(ship.owner_id().unwrap(), None);

    let mut expected_master = 2;
    let mut node = &ship;
    for (selector, id) in plan.levels().iter().zip([3, 4, 5]) {
        node = first_child(node, selector).unwrap();
        assert_eq!(node.id().unwrap(), Some(id));
        assert_eq!(node.master_id().unwrap(), Some(expected_master));
        assert_eq!(node.owner_id().unwrap(), Some(1));
        expected_master = id;
    }

    // existing ids are rewritten where they stand, new links are appended
    let creature = ship.find_by_code(47)[0];
    assert_eq!(layout(creature)[0], "m_id");
    assert_eq!(
        &layout(creature)[layout(creature).len() - 2..],
        &["m_master_id", "m_owner_id"]
    );
}

#[test]
fn test_relink_with_given_owner_on_leaf() {
    let mut ship = format::parse(DESIGN).unwrap();
    let plan = RelinkPlan::new([ChildSelector::code(31), ChildSelector::code(15)])
        .with_owner_id(77)
        .leaf_takes_owner(true);

    let relinked = relink(&mut ship, &plan, &mut Sequential(10)).unwrap();
    assert_eq!(relinked.ids, vec![11, 12, 77]);

    let bridge = single_by_attribute(&ship, "m_name", "COMBRIDGE").unwrap();
    assert_eq!(bridge.id().unwrap(), Some(77));
    assert_eq!(bridge.owner_id().unwrap(), Some(77));
    assert_eq!(bridge.master_id().unwrap(), Some(12));
}

#[test]
fn test_missing_level_is_structural_error() {
    let mut ship = format::parse(DESIGN).unwrap();
    let plan = RelinkPlan::new([ChildSelector::code(31), ChildSelector::code(99)]);

    let err = relink(&mut ship, &plan, &mut Sequential(0)).unwrap_err();
    assert!(err.is_structural_error());
    assert_eq!(err.module(), "transform");
    assert!(err.to_string().contains("Frame"));
}

#[test]
fn test_single_lookups() {
    let mut ship = format::parse(DESIGN).unwrap();

    let err = single_by_attribute(&ship, "m_name", "NOTHING").unwrap_err();
    assert!(err.is_structural_error());

    let err = single_by_attribute(&ship, "m name", "x").unwrap_err();
    assert!(err.is_validation_error());

    single_by_attribute_mut(&mut ship, "m_name", "GUN")
        .unwrap()
        .set("m_broken", true)
        .unwrap();
    assert_eq!(ship.find_by_attribute("m_broken", true).unwrap().len(), 1);
}

#[test]
fn test_selector_errors_convert() {
    let err: seria::Error = "m_children:x".parse::<ChildSelector>().unwrap_err().into();
    assert!(err.is_validation_error());
    assert!(!err.is_structural_error());
}
