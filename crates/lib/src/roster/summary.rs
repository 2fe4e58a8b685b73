//! Read-only views of fleets in a world save.

use std::fmt;

use serde::Serialize;

use crate::{
    Result,
    constants::{CHILDREN, NAME},
    node::{Node, Value},
};

/// What an escadra does on the strategic map, stored as `m_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Player,
    Convoy,
    Garrison,
    #[serde(rename = "Strike Group")]
    StrikeGroup,
}

impl Role {
    /// Maps an `m_role` value; unknown values have no role.
    pub fn from_code(code: i64) -> Option<Role> {
        match code {
            0 => Some(Role::Player),
            1 => Some(Role::Convoy),
            2 => Some(Role::Garrison),
            5 => Some(Role::StrikeGroup),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Role::Player => 0,
            Role::Convoy => 1,
            Role::Garrison => 2,
            Role::StrikeGroup => 5,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Player => "Player",
            Role::Convoy => "Convoy",
            Role::Garrison => "Garrison",
            Role::StrikeGroup => "Strike Group",
        };
        f.write_str(name)
    }
}

/// A map position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Reads `<group>.x` and `<group>.y`, treating missing coordinates as 0.
    pub fn read(node: &Node, group: &str) -> Result<Self> {
        Ok(Self {
            x: node.get_as_or(format!("{group}.x"), 0.0)?,
            y: node.get_as_or(format!("{group}.y"), 0.0)?,
        })
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

/// Overview of one escadra, as shown when browsing a save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EscadraSummary {
    pub id: Option<i64>,
    pub name: String,
    pub role: Option<Role>,
    pub ships: Vec<String>,
    pub position: Point,
    pub target: Point,
    pub speed: f64,
    pub heading: f64,
    /// Total carried craft; only counted for garrisons
    pub crafts: f64,
    /// Total carried missiles; only counted for garrisons
    pub nukes: f64,
}

impl EscadraSummary {
    /// Summarises an `Escadra` node.
    ///
    /// Garrison totals require every ship to carry a creature record (code 47);
    /// a ship without one fails with `StructuralAssumptionViolated`.
    pub fn from_escadra(escadra: &Node) -> Result<Self> {
        let ships = escadra.children_by_slot(CHILDREN)?;
        let role = Role::from_code(escadra.get_as_or("m_role", 0)?);

        let mut crafts = 0.0;
        let mut nukes = 0.0;
        if role == Some(Role::Garrison) {
            for ship in &ships {
                let creature = super::creature(ship)?;
                crafts += creature.get_as_or::<f64>("m_tele_crafts", 0.0)?.max(0.0);
                nukes += creature.get_as_or::<f64>("m_tele_nukes", 0.0)?.max(0.0);
            }
        }

        Ok(Self {
            id: escadra.id()?,
            name: display_name(escadra)?,
            role,
            ships: ships
                .iter()
                .map(|ship| display_name(ship))
                .collect::<Result<_>>()?,
            position: Point::read(escadra, "m_position")?,
            target: Point::read(escadra, "m_target_pos")?,
            speed: escadra.get_as_or("m_velocity", 0.0)?,
            heading: escadra.get_as_or("m_course", 0.0)?,
            crafts,
            nukes,
        })
    }
}

/// Renders `m_name` whatever it parsed as; `m_name=1941` is a name too.
fn display_name(node: &Node) -> Result<String> {
    Ok(match node.get_scalar(NAME)? {
        Some(scalar) => match scalar.value() {
            Value::Str(name) => name.clone(),
            _ => scalar.text().into_owned(),
        },
        None => String::new(),
    })
}

impl fmt::Display for EscadraSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;

        match self.role {
            Some(role) => write!(f, "{role}")?,
            None => write!(f, "None")?,
        }
        if self.crafts > 0.0 {
            write!(f, ", Aircraft")?;
        }
        if self.nukes > 0.0 {
            write!(f, ", Missile")?;
        }
        writeln!(f)?;

        writeln!(f, "{}", self.ships.join(", "))?;
        writeln!(f, "Pos: {}", self.position)?;
        writeln!(f, "Tgt: {}", self.target)?;
        write!(f, "Spd: {}, Hdg: {}", self.speed, self.heading)?;
        if self.nukes > 0.0 {
            write!(f, "\nNukes: {}", self.nukes)?;
        }
        if self.crafts > 0.0 {
            write!(f, "\nCrafts: {}", self.crafts)?;
        }
        Ok(())
    }
}
