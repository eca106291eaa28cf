use std::time::Duration;

use dark_maze_core::{tuning::Config, Command, Direction, Event, GameState};
use dark_maze_world::{apply, move_player, query, World, START_CELL};

fn tick(world: &mut World, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
        &mut events,
    );
    events
}

#[test]
fn walking_the_route_to_the_prize_wins_on_the_next_tick() {
    let mut world = World::new(Config::default(), 2024).expect("world");
    let prize = query::maze(&world).prize();
    let route = query::route(&world, START_CELL, prize).expect("prize reachable");

    let mut events = Vec::new();
    let mut current = START_CELL;
    for next in route {
        let direction = Direction::between(current, next).expect("adjacent waypoint");
        assert!(move_player(&mut world, direction, &mut events));
        current = next;
    }

    assert_eq!(query::player_cell(&world), prize);
    assert_eq!(query::game_state(&world), GameState::Exploring);

    let events = tick(&mut world, 16);
    assert!(events.contains(&Event::GameStateChanged {
        from: GameState::Exploring,
        to: GameState::Victory,
    }));
    assert_eq!(query::game_state(&world), GameState::Victory);
}

#[test]
fn pursuer_on_the_player_ends_the_game() {
    let mut world = World::new(Config::default(), 7).expect("world");
    assert!(world.place_pursuer(START_CELL));

    let events = tick(&mut world, 16);
    assert!(events.contains(&Event::GameStateChanged {
        from: GameState::Exploring,
        to: GameState::GameOver,
    }));
}

#[test]
fn adjacent_pursuer_catches_the_player_on_its_first_step() {
    let mut world = World::new(Config::default(), 7).expect("world");
    let neighbor = query::maze(&world)
        .walkable_neighbors(START_CELL)
        .next()
        .expect("start has an open neighbor");
    assert!(world.place_pursuer(neighbor));

    let events = tick(&mut world, 1_100);
    assert!(events.contains(&Event::PursuerAdvanced {
        from: neighbor,
        to: START_CELL,
    }));
    assert_eq!(query::pursuer_cell(&world), START_CELL);
    assert_eq!(query::game_state(&world), GameState::GameOver);

    assert!(tick(&mut world, 1_100).is_empty());
}

#[test]
fn moving_into_a_wall_is_rejected() {
    let mut world = World::new(Config::default(), 11).expect("world");
    let mut events = Vec::new();

    assert!(!move_player(&mut world, Direction::North, &mut events));
    assert_eq!(query::player_cell(&world), START_CELL);
    assert_eq!(
        events,
        vec![Event::PlayerMoveRejected {
            from: START_CELL,
            attempted: START_CELL.offset(Direction::North),
        }]
    );
}

#[test]
fn reset_after_game_over_restores_a_fresh_session() {
    let mut world = World::new(Config::default(), 99).expect("world");
    let mut events = Vec::new();

    let step = query::maze(&world)
        .walkable_neighbors(START_CELL)
        .next()
        .expect("start has an open neighbor");
    let direction = Direction::between(START_CELL, step).expect("adjacent");
    assert!(move_player(&mut world, direction, &mut events));
    assert!(world.place_pursuer(step));
    let _ = tick(&mut world, 16);
    assert_eq!(query::game_state(&world), GameState::GameOver);

    events.clear();
    apply(&mut world, Command::Reset, &mut events);

    assert_eq!(query::game_state(&world), GameState::Exploring);
    assert_eq!(query::player_cell(&world), START_CELL);
    assert_eq!(query::aim(&world), glam::Vec2::new(1.0, 0.0));
    let footprints = query::footprints(&world);
    assert_eq!(footprints.len(), 1);
    assert_eq!(footprints[0].0, START_CELL);
    assert!(events.contains(&Event::GameStateChanged {
        from: GameState::GameOver,
        to: GameState::Exploring,
    }));
    assert!(query::maze(&world).is_walkable(query::pursuer_cell(&world)));
}

#[test]
fn identical_seeds_replay_identically() {
    let script = [
        Command::MovePlayer {
            direction: Direction::East,
        },
        Command::Tick {
            dt: Duration::from_millis(600),
        },
        Command::MovePlayer {
            direction: Direction::South,
        },
        Command::Tick {
            dt: Duration::from_millis(600),
        },
        Command::Reset,
        Command::Tick {
            dt: Duration::from_millis(600),
        },
    ];

    let run = |seed: u64| {
        let mut world = World::new(Config::default(), seed).expect("world");
        let mut events = Vec::new();
        for command in script.iter().cloned() {
            apply(&mut world, command, &mut events);
        }
        (events, query::snapshot(&world))
    };

    assert_eq!(run(314), run(314));
}

#[test]
fn visible_cells_are_sorted_and_bounded() {
    let world = World::new(Config::default(), 5).expect("world");
    let view = query::visible_cells(&world);
    assert!(!view.is_empty());

    let cells: Vec<_> = view.iter().map(|visible| visible.cell).collect();
    let mut sorted = cells.clone();
    sorted.sort_by_key(|cell| (cell.y(), cell.x()));
    assert_eq!(cells, sorted);
    assert!(view
        .iter()
        .all(|visible| visible.intensity > 0.0 && visible.intensity <= 1.0));
}
