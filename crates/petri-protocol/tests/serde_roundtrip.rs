use petri_protocol::{
    Command, Coord, Direction, Entity, OrganId, OrganKind, OrganSnapshot, Player, ProteinKind,
};

#[test]
fn command_roundtrips_through_json() {
    let commands = [
        Command::Grow {
            from: OrganId::new(3),
            at: Coord::new(7, 2),
            kind: OrganKind::Sporer,
            facing: Direction::South,
        },
        Command::Spore {
            from: OrganId::new(9),
            at: Coord::new(0, 11),
        },
        Command::Wait,
    ];

    for command in commands {
        let json = serde_json::to_string(&command).expect("serialize");
        let back: Command = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, command);
    }
}

#[test]
fn entity_roundtrips_through_json() {
    let entities = [
        Entity::wall(Coord::new(1, 1)),
        Entity::protein(Coord::new(2, 3), ProteinKind::D),
        Entity::organ(
            Coord::new(4, 4),
            OrganSnapshot {
                id: OrganId::new(17),
                owner: Player::Foe,
                kind: OrganKind::Tentacle,
                facing: Direction::West,
                parent: Some(OrganId::new(12)),
                root: OrganId::new(2),
            },
        ),
    ];

    for entity in entities {
        let json = serde_json::to_string(&entity).expect("serialize");
        let back: Entity = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, entity);
    }
}
