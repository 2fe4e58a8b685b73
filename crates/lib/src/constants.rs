//! Constants used throughout the seria library.
//!
//! This module provides central definitions for the attribute keys, slot names and
//! type codes the game uses for the objects the toolkit edits.

/// Identity attribute: the node's own handle.
pub const ID: &str = "m_id";

/// Identity attribute: the direct structural parent's handle.
pub const MASTER_ID: &str = "m_master_id";

/// Identity attribute: a logical owner further up the tree.
pub const OWNER_ID: &str = "m_owner_id";

/// Display name attribute shared by most objects.
pub const NAME: &str = "m_name";

/// Slot holding sub-objects (ships in a fleet, frames in a ship, modules in a frame).
pub const CHILDREN: &str = "m_children";

/// Slot holding hull meshes inside a ship frame.
pub const MESH: &str = "m_mesh";

/// Slot holding a fleet's inventory node.
pub const INVENTORY: &str = "m_inventory";

/// Slot holding map intel markers.
pub const INTELS: &str = "m_intels";

/// Slot holding fleets inside a world save.
pub const ESCADRAS: &str = "m_escadras";

/// Type codes of the objects the roster tools touch.
pub mod code {
    /// A ship inside a fleet roster, and a generic node
    pub const SHIP: i64 = 7;
    /// A ship's main frame
    pub const FRAME: i64 = 31;
    /// The command bridge module
    pub const BRIDGE: i64 = 15;
    /// The crew/creature record carrying a ship's fleet statistics
    pub const CREATURE: i64 = 47;
    /// A fleet
    pub const ESCADRA: i64 = 327;
    /// A map intel marker
    pub const INTEL: i64 = 515;
}

/// `m_name` of the command bridge module inside a frame.
pub const BRIDGE_NAME: &str = "COMBRIDGE";
