//! Compaction of full ship designs into fleet roster entries.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::{
    Result,
    constants::{BRIDGE_NAME, CHILDREN, MESH, NAME, OWNER_ID, code},
    id::{IdGenerator, RandomIds},
    node::Node,
    transform::{AllowList, ChildSelector, RelinkPlan, first_child_mut, prune, relink},
};

use super::radiation::{NormalRadiation, RadiationSampler};

/// Prefix of the generated crew profile name.
const PROFILE_PREFIX: &str = "PROFILE@№";

/// Turns ship designs into the compact form an escadra's `m_children` expects.
///
/// A compacted ship keeps only its frame, the frame keeps only its meshes and the
/// command bridge, and the whole chain down to the bridge's creature record gets
/// fresh identities. The design passed in is never modified.
///
/// # Examples
///
/// ```
/// use seria::format;
/// use seria::roster::Compactor;
///
/// let design = format::parse(
///     "Ship 7\n{\n\tm_name=BRIG\n\tm_children Frame 31\n\t{\n\t\tm_center.x=1\n\
///      \t\tm_children Module 15\n\t\t{\n\t\t\tm_name=COMBRIDGE\n\
///      \t\t\tm_children Creature 47\n\t\t\t{\n\t\t\t\tcreatureId=12\n\t\t\t}\n\t\t}\n\t}\n}\n",
/// )?;
///
/// let mut compactor = Compactor::seeded(1);
/// let ship = compactor.compact_ship(&design, 900, 1, &[])?;
///
/// assert_eq!(ship.master_id()?, Some(900));
/// let creature = ship.find_by_code(47)[0];
/// assert_eq!(creature.get_as::<i64>("m_escadra.id")?, Some(900));
/// assert_eq!(creature.get_as::<i64>("creatureId")?, None);
/// # Ok::<(), seria::Error>(())
/// ```
#[derive(Debug)]
pub struct Compactor<G = RandomIds, S = NormalRadiation> {
    ids: G,
    radiation: S,
    rng: StdRng,
}

impl Compactor {
    /// A compactor with entropy-seeded identifiers, radiation and names.
    pub fn new() -> Self {
        Self::with_parts(RandomIds::new(), NormalRadiation::new(), StdRng::from_entropy())
    }

    /// A fully deterministic compactor.
    pub fn seeded(seed: u64) -> Self {
        Self::with_parts(
            RandomIds::seeded(seed),
            NormalRadiation::seeded(seed.wrapping_add(1)),
            StdRng::seed_from_u64(seed.wrapping_add(2)),
        )
    }
}

impl Default for Compactor {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: IdGenerator, S: RadiationSampler> Compactor<G, S> {
    pub fn with_parts(ids: G, radiation: S, rng: StdRng) -> Self {
        Self {
            ids,
            radiation,
            rng,
        }
    }

    /// Draws an identifier from the compactor's generator.
    pub fn next_id(&mut self) -> i64 {
        self.ids.next_id()
    }

    fn profile_name(&mut self) -> String {
        let digits: String = (0..3)
            .map(|_| char::from(b'0' + self.rng.gen_range(0..9u8)))
            .collect();
        format!("{PROFILE_PREFIX}{digits}")
    }

    /// Compacts a copy of `design` for the escadra `escadra_id`.
    ///
    /// `escadra_index` is the ship's 1-based position in the roster and
    /// `known_radiation` the `m_radiation_extra` values of ships already in the fleet.
    ///
    /// Fails with `StructuralAssumptionViolated` when the design lacks a frame, the
    /// frame lacks a bridge, or the bridge lacks a creature record.
    pub fn compact_ship(
        &mut self,
        design: &Node,
        escadra_id: i64,
        escadra_index: usize,
        known_radiation: &[f64],
    ) -> Result<Node> {
        let mut ship = design.clone();
        let frame_selector = ChildSelector::slot_code(CHILDREN, code::FRAME);

        prune(&mut ship, &AllowList::new().with(frame_selector.clone()));

        let frame = first_child_mut(&mut ship, &frame_selector)?;
        let frame_allow = AllowList::new()
            .with(ChildSelector::slot(MESH))
            .with(ChildSelector::attribute(NAME, BRIDGE_NAME)?);
        prune(frame, &frame_allow);
        frame.remove("m_center.x")?;
        frame.remove("m_center.y")?;
        let bridge = first_child_mut(frame, &ChildSelector::code(code::BRIDGE))?;
        let creature_had_owner =
            first_child_mut(bridge, &ChildSelector::code(code::CREATURE))?.contains_key(OWNER_ID)?;

        let plan = RelinkPlan::new([
            frame_selector.clone(),
            ChildSelector::code(code::BRIDGE),
            ChildSelector::code(code::CREATURE),
        ])
        .with_master_id(escadra_id)
        .leaf_takes_owner(true);
        let relinked = relink(&mut ship, &plan, &mut self.ids)?;
        ship.set("m_state", 2)?;

        let name = self.profile_name();
        let radiation = self.radiation.sample(known_radiation);

        let frame = first_child_mut(&mut ship, &frame_selector)?;
        let bridge = first_child_mut(frame, &ChildSelector::code(code::BRIDGE))?;
        let creature = first_child_mut(bridge, &ChildSelector::code(code::CREATURE))?;

        creature.set(NAME, name.as_str())?;
        creature.set("m_health_lock", true)?;
        creature.set("m_bio_snapshot", "no_photo")?;
        creature.set("m_escadra.id", escadra_id)?;
        creature.set("m_alignment", -1)?;
        creature.set("m_tele_parts", 3)?;
        creature.set("m_tele_parts_integral", 3)?;
        creature.set("m_escadra_index", escadra_index)?;
        creature.set("m_radiation_extra", radiation)?;
        creature.remove("creatureId")?;
        creature.remove("m_damageCounter")?;
        // a newly added owner key trails the crew fields
        if !creature_had_owner {
            creature.remove(OWNER_ID)?;
            creature.set_owner_id(relinked.owner_id)?;
        }

        debug!(
            ship = relinked.ids[0],
            owner = relinked.owner_id,
            escadra_id,
            escadra_index,
            profile = name.as_str(),
            "compacted ship"
        );
        Ok(ship)
    }
}
