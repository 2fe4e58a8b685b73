//! Fleet (escadra) editing on world saves.
//!
//! A world save stores its fleets as `m_escadras`/327 children of the root. Each
//! escadra lists its ships as `m_children`/7 children in compact form: a ship holding
//! its frame, the frame holding meshes and the command bridge, the bridge holding
//! the creature record that carries the ship's fleet statistics.
//!
//! Everything here is composed from the [`transform`](crate::transform) primitives
//! and the [`Node`] contract; nothing reaches into the text format.

use tracing::debug;

use crate::{
    Result,
    constants::{BRIDGE_NAME, CHILDREN, ESCADRAS, NAME, code},
    id::IdGenerator,
    node::{Node, SplicePolicy},
    transform::{ChildSelector, TransformError, first_child, single_by_attribute},
};

mod compact;
mod escadra;
pub mod radiation;
mod summary;

pub use compact::Compactor;
pub use escadra::{EscadraBuilder, EscadraEdit, ShipChoice, edit_escadra};
pub use radiation::{NormalRadiation, RadiationSampler};
pub use summary::{EscadraSummary, Point, Role};

/// The first creature record (code 47) in a ship, depth-first.
pub(crate) fn creature(ship: &Node) -> Result<&Node> {
    ship.find_by_code(code::CREATURE)
        .into_iter()
        .next()
        .ok_or_else(|| {
            TransformError::StructuralAssumptionViolated {
                parent: ship.classname().to_string(),
                expected: "a creature record".to_string(),
            }
            .into()
        })
}

/// The creature on a compacted ship's command bridge.
fn bridge_creature(ship: &Node) -> Result<&Node> {
    let bridge = single_by_attribute(ship, NAME, BRIDGE_NAME)?;
    first_child(bridge, &ChildSelector::code(code::CREATURE))
}

/// `m_radiation_extra` of every ship in the escadra, in roster order.
///
/// Ships without a value count as 0.
pub fn radiation_values(escadra: &Node) -> Result<Vec<f64>> {
    escadra
        .children_by_slot(CHILDREN)?
        .into_iter()
        .map(|ship| -> Result<f64> {
            Ok(bridge_creature(ship)?.get_as_or("m_radiation_extra", 0.0)?)
        })
        .collect()
}

/// Replaces every ship of `escadra` with compacted copies of `designs`.
///
/// New radiation values are sampled from those of the ships being replaced and the
/// new ships are indexed from 1 in the given order. Returns the removed ships.
pub fn replace_ships<G, S>(
    escadra: &mut Node,
    designs: &[Node],
    compactor: &mut Compactor<G, S>,
    policy: SplicePolicy,
) -> Result<Vec<Node>>
where
    G: IdGenerator,
    S: RadiationSampler,
{
    let escadra_id = escadra.id()?.ok_or_else(|| TransformError::StructuralAssumptionViolated {
        parent: escadra.classname().to_string(),
        expected: "an m_id".to_string(),
    })?;
    let known = radiation_values(escadra)?;

    let ships = designs
        .iter()
        .enumerate()
        .map(|(index, design)| compactor.compact_ship(design, escadra_id, index + 1, &known))
        .collect::<Result<Vec<_>>>()?;

    debug!(escadra_id, replaced = known.len(), added = ships.len(), "replacing ships");
    Ok(escadra.replace_children(CHILDREN, code::SHIP, ships, policy))
}

/// Rewrites `m_escadra_index` on every ship's creature to its 1-based roster position.
///
/// Returns the number of ships.
pub fn reindex_ships(escadra: &mut Node) -> Result<usize> {
    let parent = escadra.classname().to_string();
    let ships = escadra.children_by_slot_mut(CHILDREN)?;
    let count = ships.len();

    for (index, ship) in ships.into_iter().enumerate() {
        let creature = ship.find_first_by_code_mut(code::CREATURE).ok_or_else(|| {
            TransformError::StructuralAssumptionViolated {
                parent: parent.clone(),
                expected: format!("a creature record on ship {}", index + 1),
            }
        })?;
        creature.set("m_escadra_index", index + 1)?;
    }

    Ok(count)
}

/// Replaces the save's escadras, keeping their place among the save's entries.
///
/// The new run goes where the first existing escadra was, or at the end of a save
/// without escadras. Returns the removed escadras.
pub fn export_escadras(save: &mut Node, escadras: Vec<Node>) -> Vec<Node> {
    debug!(count = escadras.len(), "exporting escadras");
    save.replace_children(
        ESCADRAS,
        code::ESCADRA,
        escadras,
        SplicePolicy::BeforeFirstOfSlot,
    )
}

/// All escadras of a save, in file order.
pub fn escadras(save: &Node) -> Result<Vec<&Node>> {
    Ok(save.children_by_slot(ESCADRAS)?)
}

/// Escadras strictly closer than `radius` to `center`.
///
/// Escadras without a position are treated as sitting at the origin.
pub fn escadras_near(save: &Node, center: Point, radius: f64) -> Result<Vec<&Node>> {
    let mut found = Vec::new();
    for escadra in escadras(save)? {
        if Point::read(escadra, "m_position")?.distance(&center) < radius {
            found.push(escadra);
        }
    }
    Ok(found)
}
