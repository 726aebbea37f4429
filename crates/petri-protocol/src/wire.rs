//! Line-oriented text protocol spoken with the referee.
//!
//! One `width height` line at game start, then per turn: an entity count, one
//! line per entity, both players' protein stocks, and the required action
//! count. Commands go back as one line per organism (see [`crate::Command`]).

use std::io::BufRead;

use thiserror::Error;

use crate::{Coord, Direction, Entity, OrganId, OrganKind, OrganSnapshot, Player, ProteinKind};

#[derive(Debug, Error)]
pub enum WireError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected end of input")]
    Eof,
    #[error("malformed line {line:?}: {reason}")]
    Malformed { line: String, reason: &'static str },
}

impl WireError {
    fn malformed(line: &str, reason: &'static str) -> WireError {
        WireError::Malformed {
            line: line.to_owned(),
            reason,
        }
    }
}

/// Game-start header, fixed for the whole game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameInit {
    pub width: u32,
    pub height: u32,
}

/// Everything the referee sends for one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnInput {
    pub entities: Vec<Entity>,
    /// Own protein stock, indexed by [`ProteinKind::index`].
    pub my_stock: [u32; 4],
    /// Opponent protein stock, same indexing.
    pub foe_stock: [u32; 4],
    /// One action is expected per living organism.
    pub required_actions: u32,
}

pub fn read_init(input: &mut impl BufRead) -> Result<GameInit, WireError> {
    let line = read_line(input)?;
    let mut fields = line.split_ascii_whitespace();
    let width = parse_int(&line, fields.next())?;
    let height = parse_int(&line, fields.next())?;
    Ok(GameInit { width, height })
}

pub fn read_turn(input: &mut impl BufRead) -> Result<TurnInput, WireError> {
    let count_line = read_line(input)?;
    let entity_count: usize = parse_int(&count_line, Some(count_line.trim()))?;

    let mut entities = Vec::with_capacity(entity_count);
    for _ in 0..entity_count {
        let line = read_line(input)?;
        entities.push(parse_entity(&line)?);
    }

    let my_stock = read_stock(input)?;
    let foe_stock = read_stock(input)?;

    let actions_line = read_line(input)?;
    let required_actions = parse_int(&actions_line, Some(actions_line.trim()))?;

    Ok(TurnInput {
        entities,
        my_stock,
        foe_stock,
        required_actions,
    })
}

/// Parse one entity line: `x y TYPE owner id direction parent root`.
pub fn parse_entity(line: &str) -> Result<Entity, WireError> {
    let mut fields = line.split_ascii_whitespace();

    let x: i32 = parse_int(line, fields.next())?;
    let y: i32 = parse_int(line, fields.next())?;
    let pos = Coord::new(x, y);

    let type_tag = fields
        .next()
        .ok_or_else(|| WireError::malformed(line, "missing type tag"))?;
    let owner: i32 = parse_int(line, fields.next())?;
    let id: u32 = parse_int(line, fields.next())?;
    let direction = fields
        .next()
        .ok_or_else(|| WireError::malformed(line, "missing direction"))?;
    let parent: u32 = parse_int(line, fields.next())?;
    let root: u32 = parse_int(line, fields.next())?;

    if type_tag == "WALL" {
        return Ok(Entity::wall(pos));
    }
    if let Some(kind) = ProteinKind::from_wire(type_tag) {
        return Ok(Entity::protein(pos, kind));
    }
    let Some(kind) = OrganKind::from_wire(type_tag) else {
        return Err(WireError::malformed(line, "unknown type tag"));
    };

    let owner = match owner {
        1 => Player::Me,
        0 => Player::Foe,
        _ => return Err(WireError::malformed(line, "organ without owner")),
    };
    let facing = direction
        .chars()
        .next()
        .and_then(Direction::from_char)
        .ok_or_else(|| WireError::malformed(line, "organ without facing"))?;

    Ok(Entity::organ(
        pos,
        OrganSnapshot {
            id: OrganId::new(id),
            owner,
            kind,
            facing,
            parent: (parent != 0).then_some(OrganId::new(parent)),
            root: OrganId::new(root),
        },
    ))
}

fn read_stock(input: &mut impl BufRead) -> Result<[u32; 4], WireError> {
    let line = read_line(input)?;
    let mut fields = line.split_ascii_whitespace();
    let mut stock = [0u32; 4];
    for slot in &mut stock {
        *slot = parse_int(&line, fields.next())?;
    }
    Ok(stock)
}

fn read_line(input: &mut impl BufRead) -> Result<String, WireError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(WireError::Eof);
    }
    Ok(line)
}

fn parse_int<T: std::str::FromStr>(line: &str, field: Option<&str>) -> Result<T, WireError> {
    field
        .ok_or_else(|| WireError::malformed(line, "missing field"))?
        .parse()
        .map_err(|_| WireError::malformed(line, "invalid integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityKind;

    #[test]
    fn parses_init_line() {
        let mut input = "18 9\n".as_bytes();
        let init = read_init(&mut input).expect("init");
        assert_eq!(init, GameInit { width: 18, height: 9 });
    }

    #[test]
    fn parses_wall_protein_and_organ_lines() {
        let wall = parse_entity("3 4 WALL -1 0 X 0 0").expect("wall");
        assert_eq!(wall, Entity::wall(Coord::new(3, 4)));

        let protein = parse_entity("5 1 C -1 0 X 0 0").expect("protein");
        assert_eq!(protein, Entity::protein(Coord::new(5, 1), ProteinKind::C));

        let organ = parse_entity("2 2 HARVESTER 1 7 E 3 1").expect("organ");
        let EntityKind::Organ(snapshot) = organ.kind else {
            panic!("expected organ");
        };
        assert_eq!(snapshot.id, OrganId::new(7));
        assert_eq!(snapshot.owner, Player::Me);
        assert_eq!(snapshot.kind, OrganKind::Harvester);
        assert_eq!(snapshot.facing, Direction::East);
        assert_eq!(snapshot.parent, Some(OrganId::new(3)));
        assert_eq!(snapshot.root, OrganId::new(1));
    }

    #[test]
    fn root_has_no_parent() {
        let organ = parse_entity("0 0 ROOT 0 1 N 0 1").expect("root");
        let EntityKind::Organ(snapshot) = organ.kind else {
            panic!("expected organ");
        };
        assert_eq!(snapshot.owner, Player::Foe);
        assert_eq!(snapshot.parent, None);
        assert_eq!(snapshot.root, OrganId::new(1));
    }

    #[test]
    fn rejects_unknown_type_tag() {
        let err = parse_entity("0 0 BLOB -1 0 X 0 0").unwrap_err();
        assert!(matches!(err, WireError::Malformed { .. }));
    }

    #[test]
    fn reads_a_full_turn() {
        let text = "\
2
0 0 ROOT 1 1 N 0 1
2 0 A -1 0 X 0 0
10 1 2 3
0 0 0 4
1
";
        let mut input = text.as_bytes();
        let turn = read_turn(&mut input).expect("turn");
        assert_eq!(turn.entities.len(), 2);
        assert_eq!(turn.my_stock, [10, 1, 2, 3]);
        assert_eq!(turn.foe_stock, [0, 0, 0, 4]);
        assert_eq!(turn.required_actions, 1);
    }

    #[test]
    fn eof_is_distinguished_from_malformed() {
        let mut input = "".as_bytes();
        assert!(matches!(read_turn(&mut input), Err(WireError::Eof)));
    }
}
