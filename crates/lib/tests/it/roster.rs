//! Fleet editing on a world save.

use seria::{
    Node, format,
    node::SplicePolicy,
    roster::{
        self, EscadraBuilder, EscadraEdit, EscadraSummary, NormalRadiation, Point,
        RadiationSampler, Role, ShipChoice,
    },
};

use crate::helpers::{Fixed, compactor, design, layout, save};

fn garrison(radiation: &mut Fixed) -> Node {
    EscadraBuilder::new("RAIDERS")
        .position(Point::new(-50.0, 20.5))
        .target(Point::new(3.0, 4.0))
        .role(Role::Garrison)
        .ships([design("ALPHA"), design("BRAVO")])
        .build(&mut compactor(1000, radiation))
        .unwrap()
}

#[test]
fn test_build_escadra() {
    let mut radiation = Fixed::new(0.5);
    let escadra = garrison(&mut radiation);
    assert_eq!(radiation.seen, vec![Vec::<f64>::new(), Vec::new()]);

    assert_eq!(escadra.id().unwrap(), Some(1001));
    assert_eq!(
        layout(&escadra),
        vec![
            "m_id",
            "m_name",
            "m_children/7",
            "m_children/7",
            "m_position.x",
            "m_position.y",
            "m_alignment",
            "m_target_pos.x",
            "m_target_pos.y",
            "m_role",
            "m_inventory/7",
            "m_intels/515",
        ]
    );

    let ships = escadra.children_by_slot("m_children").unwrap();
    for (index, ship) in ships.iter().enumerate() {
        assert_eq!(ship.master_id().unwrap(), Some(1001));
        let creature = ship.find_by_code(47)[0];
        assert_eq!(creature.get_as::<i64>("m_escadra.id").unwrap(), Some(1001));
        assert_eq!(
            creature.get_as::<i64>("m_escadra_index").unwrap(),
            Some(index as i64 + 1)
        );
        assert_eq!(creature.owner_id().unwrap(), creature.id().unwrap());
    }
    // owner, ship, frame and bridge ids for each ship, then inventory and intel
    assert_eq!(ships[1].id().unwrap(), Some(1007));
    assert_eq!(escadra.children_by_slot("m_inventory").unwrap()[0].id().unwrap(), Some(1010));

    let intel = escadra.children_by_slot("m_intels").unwrap()[0];
    assert_eq!(intel.get_as::<i64>("m_mark.id").unwrap(), Some(1011));
    assert_eq!(intel.get_as::<&str>("m_name").unwrap(), Some("RAIDERS"));
    assert_eq!(intel.get_as::<f64>("m_position.x").unwrap(), Some(-50.0));
    assert_eq!(intel.get_as::<bool>("m_rad_encrypted").unwrap(), Some(true));
}

#[test]
fn test_summary_of_built_garrison() {
    let escadra = garrison(&mut Fixed::new(0.5));
    let summary = EscadraSummary::from_escadra(&escadra).unwrap();

    assert_eq!(summary.name, "RAIDERS");
    assert_eq!(summary.role, Some(Role::Garrison));
    assert_eq!(summary.ships, vec!["ALPHA", "BRAVO"]);
    assert_eq!(summary.crafts, 4.0);
    assert_eq!(summary.nukes, 2.0);
    assert_eq!(summary.target, Point::new(3.0, 4.0));

    let text = summary.to_string();
    assert!(text.starts_with("RAIDERS\nGarrison, Aircraft, Missile\nALPHA, BRAVO\nPos: -50, 20.5\n"));

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["role"], "Garrison");
    assert_eq!(json["ships"][1], "BRAVO");
}

#[test]
fn test_export_and_reload() {
    let escadra = garrison(&mut Fixed::new(0.5));
    let mut world = save();

    let removed = roster::export_escadras(&mut world, vec![escadra.clone()]);
    assert_eq!(removed.len(), 2);
    assert_eq!(layout(&world), vec!["m_version", "m_escadras/327", "m_time"]);

    let reloaded = format::parse(&format::write(&world)).unwrap();
    assert_eq!(reloaded, world);
    assert_eq!(roster::escadras(&reloaded).unwrap(), vec![&escadra]);
}

#[test]
fn test_replace_ships_samples_from_replaced_fleet() {
    let mut escadra = garrison(&mut Fixed::new(0.5));
    assert_eq!(roster::radiation_values(&escadra).unwrap(), vec![0.5, 0.5]);

    let mut radiation = Fixed::new(0.75);
    let removed = roster::replace_ships(
        &mut escadra,
        &[design("C"), design("D"), design("E")],
        &mut compactor(5000, &mut radiation),
        SplicePolicy::BeforeFirstOfSlot,
    )
    .unwrap();

    assert_eq!(removed.len(), 2);
    assert_eq!(radiation.seen, vec![vec![0.5, 0.5]; 3]);
    assert_eq!(roster::radiation_values(&escadra).unwrap(), vec![0.75; 3]);
    assert_eq!(
        &layout(&escadra)[..6],
        &["m_id", "m_name", "m_children/7", "m_children/7", "m_children/7", "m_position.x"]
    );

    let summary = EscadraSummary::from_escadra(&escadra).unwrap();
    assert_eq!(summary.ships, vec!["C", "D", "E"]);
}

#[test]
fn test_replace_ships_requires_escadra_id() {
    let mut escadra = garrison(&mut Fixed::new(0.5));
    escadra.remove("m_id").unwrap();

    let err = roster::replace_ships(
        &mut escadra,
        &[design("C")],
        &mut compactor(0, &mut Fixed::new(1.0)),
        SplicePolicy::Append,
    )
    .unwrap_err();
    assert!(err.is_structural_error());
    assert_eq!(escadra.children_by_slot("m_children").unwrap().len(), 2);
}

#[test]
fn test_reindex_after_removal() {
    let mut escadra = garrison(&mut Fixed::new(0.5));
    let mut seen = 0;
    escadra.retain_children(|child| {
        if child.slot() != "m_children" {
            return true;
        }
        seen += 1;
        seen != 1
    });

    assert_eq!(roster::reindex_ships(&mut escadra).unwrap(), 1);
    let ship = escadra.children_by_slot("m_children").unwrap()[0];
    assert_eq!(ship.get_as::<&str>("m_name").unwrap(), Some("BRAVO"));
    assert_eq!(
        ship.find_by_code(47)[0].get_as::<i64>("m_escadra_index").unwrap(),
        Some(1)
    );
}

fn creature_index(ship: &Node) -> Option<i64> {
    ship.find_by_code(47)[0].get_as("m_escadra_index").unwrap()
}

#[test]
fn test_edit_keeps_and_adds_ships_in_chosen_order() {
    let mut escadra = garrison(&mut Fixed::new(0.5));
    let edit = EscadraEdit::new()
        .name("RENAMED")
        .position(Point::new(1.0, 2.0))
        .role(Role::StrikeGroup)
        .keep_ship(1)
        .add_ship(design("NEW"))
        .keep_ship(0);

    let mut radiation = Fixed::new(0.9);
    let dropped = roster::edit_escadra(&mut escadra, edit, &mut compactor(2000, &mut radiation)).unwrap();
    assert!(dropped.is_empty());
    assert_eq!(radiation.seen, vec![vec![0.5, 0.5]]);

    // the rebuilt roster goes after everything else
    assert_eq!(
        layout(&escadra),
        vec![
            "m_id",
            "m_name",
            "m_position.x",
            "m_position.y",
            "m_alignment",
            "m_target_pos.x",
            "m_target_pos.y",
            "m_role",
            "m_inventory/7",
            "m_intels/515",
            "m_children/7",
            "m_children/7",
            "m_children/7",
        ]
    );

    let summary = EscadraSummary::from_escadra(&escadra).unwrap();
    assert_eq!(summary.name, "RENAMED");
    assert_eq!(summary.role, Some(Role::StrikeGroup));
    assert_eq!(summary.ships, vec!["BRAVO", "NEW", "ALPHA"]);
    assert_eq!(summary.position, Point::new(1.0, 2.0));
    assert_eq!(summary.target, Point::new(3.0, 4.0));

    let ships = escadra.children_by_slot("m_children").unwrap();
    let indexes: Vec<Option<i64>> = ships.iter().map(|ship| creature_index(ship)).collect();
    assert_eq!(indexes, vec![Some(1), Some(2), Some(3)]);
    assert_eq!(ships[0].id().unwrap(), Some(1007));
    assert_eq!(ships[1].id().unwrap(), Some(2002));
    assert_eq!(ships[1].master_id().unwrap(), Some(1001));
    assert_eq!(roster::radiation_values(&escadra).unwrap(), vec![0.5, 0.9, 0.5]);
}

#[test]
fn test_edit_leaves_player_role_alone() {
    let mut world = save();
    let mut radiation = Fixed::new(1.0);
    let mut compactor = compactor(0, &mut radiation);
    for escadra in world.children_by_slot_mut("m_escadras").unwrap() {
        let edit = EscadraEdit::new().role(Role::Garrison).target(Point::new(7.0, 8.0));
        assert!(roster::edit_escadra(escadra, edit, &mut compactor).unwrap().is_empty());
    }

    let summaries: Vec<EscadraSummary> = roster::escadras(&world)
        .unwrap()
        .into_iter()
        .map(|escadra| EscadraSummary::from_escadra(escadra).unwrap())
        .collect();
    assert_eq!(summaries[0].name, "DERBENT");
    assert_eq!(summaries[0].role, Some(Role::Garrison));
    assert_eq!(summaries[1].name, "FAR");
    assert_eq!(summaries[1].role, Some(Role::Player));
    assert!(summaries.iter().all(|summary| summary.target == Point::new(7.0, 8.0)));

    let mut unassigned = Node::new("Escadra", 327);
    roster::edit_escadra(&mut unassigned, EscadraEdit::new().role(Role::Convoy), &mut compactor)
        .unwrap();
    assert!(!unassigned.contains_key("m_role").unwrap());
}

#[test]
fn test_edit_drops_unchosen_ships() {
    let mut escadra = garrison(&mut Fixed::new(0.5));
    let mut radiation = Fixed::new(0.5);
    let mut compactor = compactor(3000, &mut radiation);

    let dropped =
        roster::edit_escadra(&mut escadra, EscadraEdit::new().keep_ship(1), &mut compactor).unwrap();
    let dropped_names: Vec<Option<&str>> =
        dropped.iter().map(|ship| ship.get_as("m_name").unwrap()).collect();
    assert_eq!(dropped_names, vec![Some("ALPHA")]);
    let ships = escadra.children_by_slot("m_children").unwrap();
    assert_eq!(ships.len(), 1);
    assert_eq!(creature_index(ships[0]), Some(1));

    let emptied = roster::edit_escadra(
        &mut escadra,
        EscadraEdit::new().ships(Vec::<ShipChoice>::new()),
        &mut compactor,
    )
    .unwrap();
    assert_eq!(emptied.len(), 1);
    assert!(escadra.children_by_slot("m_children").unwrap().is_empty());
}

#[test]
fn test_edit_rejects_bad_keeps_without_changes() {
    let mut escadra = garrison(&mut Fixed::new(0.5));
    let before = escadra.clone();
    let mut radiation = Fixed::new(0.5);
    let mut compactor = compactor(0, &mut radiation);

    for edit in [
        EscadraEdit::new().name("X").keep_ship(0).keep_ship(0),
        EscadraEdit::new().name("X").add_ship(design("C")).keep_ship(2),
    ] {
        let err = roster::edit_escadra(&mut escadra, edit, &mut compactor).unwrap_err();
        assert!(err.is_structural_error());
        assert_eq!(escadra, before);
    }
}

#[test]
fn test_escadras_near() {
    let world = save();
    let names = |found: Vec<&Node>| -> Vec<String> {
        found
            .iter()
            .map(|escadra| escadra.get_as_or("m_name", String::new()).unwrap())
            .collect()
    };

    let origin = Point::default();
    assert_eq!(names(roster::escadras_near(&world, origin, 11.0).unwrap()), vec!["DERBENT"]);
    assert!(roster::escadras_near(&world, origin, 10.0).unwrap().is_empty());
    assert_eq!(
        names(roster::escadras_near(&world, Point::new(1000.0, 999.5), 1.0).unwrap()),
        vec!["FAR"]
    );
    assert_eq!(roster::escadras_near(&world, origin, f64::INFINITY).unwrap().len(), 2);
}

#[test]
fn test_summaries_of_save() {
    let world = save();
    let summaries: Vec<EscadraSummary> = roster::escadras(&world)
        .unwrap()
        .into_iter()
        .map(|escadra| EscadraSummary::from_escadra(escadra).unwrap())
        .collect();

    assert_eq!(summaries[0].role, Some(Role::Convoy));
    assert_eq!(summaries[1].role, Some(Role::Player));
    assert_eq!(summaries[0].position, Point::new(10.0, 0.0));
    assert_eq!(summaries[0].crafts, 0.0);

    let json = serde_json::to_string(&summaries).unwrap();
    assert!(json.contains("\"name\":\"FAR\""));
    assert_eq!(
        serde_json::to_value(Role::StrikeGroup).unwrap(),
        serde_json::json!("Strike Group")
    );
}

#[test]
fn test_normal_radiation_follows_known_values() {
    let mut sampler = NormalRadiation::seeded(21);
    assert_eq!(sampler.sample(&[5.0, 5.0, 5.0, 5.0]), 5.0);

    for _ in 0..50 {
        assert!(sampler.sample(&[]) > 0.0);
        assert!(sampler.sample(&[-9.0, -9.0, -9.0, -9.0]) > 0.0);
    }
}
