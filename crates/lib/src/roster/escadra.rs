//! Construction and editing of escadras.

use tracing::debug;

use crate::{
    Result,
    constants::{CHILDREN, INTELS, INVENTORY, NAME, code},
    id::IdGenerator,
    node::{Node, SplicePolicy},
    transform::TransformError,
};

use super::{Compactor, Point, Role, radiation::RadiationSampler, radiation_values};

/// Builds a new `Escadra` node from ship designs.
///
/// ```
/// use seria::node::Node;
/// use seria::roster::{Compactor, EscadraBuilder, Point, Role};
///
/// let mut compactor = Compactor::seeded(3);
/// let escadra = EscadraBuilder::new("RAIDERS")
///     .position(Point::new(120.0, -40.0))
///     .role(Role::StrikeGroup)
///     .build(&mut compactor)?;
///
/// assert_eq!(escadra.classname(), "Escadra");
/// assert_eq!(escadra.get_as::<i64>("m_role")?, Some(5));
/// assert_eq!(escadra.children_by_slot("m_intels")?[0].get_as::<&str>("m_name")?, Some("RAIDERS"));
/// # Ok::<(), seria::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct EscadraBuilder {
    name: String,
    position: Point,
    target: Point,
    role: Role,
    designs: Vec<Node>,
}

impl EscadraBuilder {
    /// A garrison at the origin with no ships.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Point::default(),
            target: Point::default(),
            role: Role::Garrison,
            designs: Vec::new(),
        }
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn target(mut self, target: Point) -> Self {
        self.target = target;
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Adds a full ship design; it is compacted when the escadra is built.
    pub fn ship(mut self, design: Node) -> Self {
        self.designs.push(design);
        self
    }

    pub fn ships(mut self, designs: impl IntoIterator<Item = Node>) -> Self {
        self.designs.extend(designs);
        self
    }

    /// Creates the escadra, its compacted ships, an empty inventory and the map
    /// intel marker that makes the escadra's name visible.
    pub fn build<G, S>(self, compactor: &mut Compactor<G, S>) -> Result<Node>
    where
        G: IdGenerator,
        S: RadiationSampler,
    {
        let mut escadra = Node::new("Escadra", code::ESCADRA);
        let escadra_id = compactor.next_id();
        escadra.set_id(escadra_id)?;
        escadra.set(NAME, self.name.as_str())?;

        for (index, design) in self.designs.iter().enumerate() {
            let ship = compactor.compact_ship(design, escadra_id, index + 1, &[])?;
            escadra.push_child(CHILDREN, ship);
        }

        escadra.set("m_position.x", self.position.x)?;
        escadra.set("m_position.y", self.position.y)?;
        escadra.set("m_alignment", -1)?;
        escadra.set("m_target_pos.x", self.target.x)?;
        escadra.set("m_target_pos.y", self.target.y)?;
        escadra.set("m_role", self.role.code())?;

        let mut inventory = Node::new("Node", code::SHIP);
        inventory.set_id(compactor.next_id())?;
        escadra.push_child(INVENTORY, inventory);

        let mut intel = Node::new("Intel", code::INTEL);
        intel.set("m_mark.id", compactor.next_id())?;
        intel.set("m_age", 0)?;
        intel.set("m_age_max", 28800)?;
        intel.set("m_type", 8)?;
        intel.set(NAME, self.name.as_str())?;
        intel.set("m_position.x", self.position.x)?;
        intel.set("m_position.y", self.position.y)?;
        intel.set("m_rad_encrypted", true)?;
        intel.set("m_size", 2)?;
        escadra.push_child(INTELS, intel);

        debug!(
            id = escadra_id,
            name = self.name.as_str(),
            ships = self.designs.len(),
            "built escadra"
        );
        Ok(escadra)
    }
}

/// One entry of an edited roster.
#[derive(Debug, Clone)]
pub enum ShipChoice {
    /// The ship currently at this 0-based roster position.
    Keep(usize),
    /// A full ship design, compacted into the escadra.
    Design(Node),
}

/// Changes to apply to an existing escadra with [`edit_escadra`].
///
/// Unset fields leave the escadra as it is. Once any ship is chosen the roster
/// becomes exactly the chosen ships, in the order they were chosen.
///
/// ```
/// use seria::roster::{Compactor, EscadraBuilder, EscadraEdit, Role, edit_escadra};
///
/// let mut compactor = Compactor::seeded(5);
/// let mut escadra = EscadraBuilder::new("OLD").role(Role::Convoy).build(&mut compactor)?;
///
/// let edit = EscadraEdit::new().name("NEW").role(Role::StrikeGroup);
/// edit_escadra(&mut escadra, edit, &mut compactor)?;
///
/// assert_eq!(escadra.get_as::<&str>("m_name")?, Some("NEW"));
/// assert_eq!(escadra.get_as::<i64>("m_role")?, Some(5));
/// # Ok::<(), seria::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct EscadraEdit {
    name: Option<String>,
    position: Option<Point>,
    target: Option<Point>,
    role: Option<Role>,
    roster: Option<Vec<ShipChoice>>,
    placement: SplicePolicy,
}

impl Default for EscadraEdit {
    fn default() -> Self {
        Self::new()
    }
}

impl EscadraEdit {
    /// An edit that changes nothing. Ships go after the escadra's other entries.
    pub fn new() -> Self {
        Self {
            name: None,
            position: None,
            target: None,
            role: None,
            roster: None,
            placement: SplicePolicy::Append,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn target(mut self, target: Point) -> Self {
        self.target = Some(target);
        self
    }

    /// The new role. Player escadras (`m_role` 0 or absent) keep their role.
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Keeps the ship at 0-based position `index` of the current roster.
    pub fn keep_ship(self, index: usize) -> Self {
        self.choose(ShipChoice::Keep(index))
    }

    /// Adds a full ship design.
    pub fn add_ship(self, design: Node) -> Self {
        self.choose(ShipChoice::Design(design))
    }

    /// Sets the new roster at once; an empty list removes every ship.
    pub fn ships(mut self, choices: impl IntoIterator<Item = ShipChoice>) -> Self {
        self.roster = Some(choices.into_iter().collect());
        self
    }

    /// Where the rebuilt roster goes among the escadra's entries.
    pub fn placement(mut self, placement: SplicePolicy) -> Self {
        self.placement = placement;
        self
    }

    fn choose(mut self, choice: ShipChoice) -> Self {
        self.roster.get_or_insert_with(Vec::new).push(choice);
        self
    }
}

/// Applies `edit` to `escadra` and returns the ships that left the roster.
///
/// Kept ships are re-indexed to their new position; designs are compacted with
/// radiation sampled from the ships the escadra had before the edit. A kept index
/// that is out of range or chosen twice fails with `StructuralAssumptionViolated`
/// before anything is changed.
pub fn edit_escadra<G, S>(
    escadra: &mut Node,
    edit: EscadraEdit,
    compactor: &mut Compactor<G, S>,
) -> Result<Vec<Node>>
where
    G: IdGenerator,
    S: RadiationSampler,
{
    let roster = match edit.roster {
        Some(choices) => Some(rebuild_roster(escadra, choices, compactor)?),
        None => None,
    };

    if let Some(name) = &edit.name {
        escadra.set(NAME, name.as_str())?;
    }

    let mut dropped = Vec::new();
    if let Some((ships, kept)) = roster {
        debug!(ships = ships.len(), kept = kept.len(), "rebuilding roster");
        let removed = escadra.replace_children(CHILDREN, code::SHIP, ships, edit.placement);
        dropped = removed
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !kept.contains(index))
            .map(|(_, ship)| ship)
            .collect();
    }

    if let Some(position) = edit.position {
        escadra.set("m_position.x", position.x)?;
        escadra.set("m_position.y", position.y)?;
    }
    if let Some(target) = edit.target {
        escadra.set("m_target_pos.x", target.x)?;
        escadra.set("m_target_pos.y", target.y)?;
    }
    if let Some(role) = edit.role {
        if escadra.get_as_or::<i64>("m_role", 0)? != 0 {
            escadra.set("m_role", role.code())?;
        } else {
            debug!(role = %role, "player escadra keeps its role");
        }
    }

    Ok(dropped)
}

/// The new roster and the old positions it keeps, without touching `escadra`.
fn rebuild_roster<G, S>(
    escadra: &Node,
    choices: Vec<ShipChoice>,
    compactor: &mut Compactor<G, S>,
) -> Result<(Vec<Node>, Vec<usize>)>
where
    G: IdGenerator,
    S: RadiationSampler,
{
    let current = escadra.children_by_slot(CHILDREN)?;
    let parent = escadra.classname();
    let violated = |expected: String| TransformError::StructuralAssumptionViolated {
        parent: parent.to_string(),
        expected,
    };

    let mut kept = Vec::new();
    for choice in &choices {
        if let ShipChoice::Keep(index) = *choice {
            if index >= current.len() || kept.contains(&index) {
                return Err(violated(format!("ship {} to be kept once", index + 1)).into());
            }
            kept.push(index);
        }
    }

    let needs_compaction = choices.iter().any(|choice| matches!(choice, ShipChoice::Design(_)));
    let (escadra_id, known) = if needs_compaction {
        let id = escadra.id()?.ok_or_else(|| violated("an m_id".to_string()))?;
        (id, radiation_values(escadra)?)
    } else {
        (0, Vec::new())
    };

    let mut ships = Vec::with_capacity(choices.len());
    for (position, choice) in choices.into_iter().enumerate() {
        let ship = match choice {
            ShipChoice::Keep(index) => {
                let mut ship = current[index].clone();
                let creature = ship
                    .find_first_by_code_mut(code::CREATURE)
                    .ok_or_else(|| violated(format!("a creature record on ship {}", index + 1)))?;
                creature.set("m_escadra_index", position + 1)?;
                ship
            }
            ShipChoice::Design(design) => {
                compactor.compact_ship(&design, escadra_id, position + 1, &known)?
            }
        };
        ships.push(ship);
    }

    Ok((ships, kept))
}
