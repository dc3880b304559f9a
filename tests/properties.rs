use mazegen::{
    Generator, Maze, MazeError, MazeParams, generate_maze,
    maze::{Coord, Direction, grid::Grid},
    solve_maze,
};

const SIZES: [(u8, u8); 7] = [(1, 2), (2, 1), (5, 5), (8, 5), (9, 6), (20, 15), (37, 11)];
const SEEDS: [u64; 4] = [1, 7, 42, 1234];

fn params(width: u8, height: u8, generator: Generator, perfect: bool, seed: u64) -> MazeParams {
    MazeParams {
        perfect,
        seed: Some(seed),
        generator,
        ..MazeParams::new(width, height, (0, 0), (width - 1, height - 1))
    }
}

fn all_mazes(perfect: bool) -> impl Iterator<Item = Maze> {
    SIZES.into_iter().flat_map(move |(w, h)| {
        SEEDS.into_iter().flat_map(move |seed| {
            [Generator::Dfs, Generator::Prim]
                .into_iter()
                .map(move |generator| generate_maze(&params(w, h, generator, perfect, seed)).unwrap())
        })
    })
}

fn find(parent: &Grid<Coord>, coord: Coord) -> Coord {
    let mut root = coord;
    while parent[root] != root {
        root = parent[root];
    }
    root
}

/// True when the open walls contain a cycle.
fn has_cycle(maze: &Maze) -> bool {
    let mut parent = Grid::from_fn(maze.width(), maze.height(), |c| c);
    for y in 0..maze.height() {
        for x in 0..maze.width() {
            for direction in [Direction::East, Direction::South] {
                if !maze.can_move((x, y), direction) {
                    continue;
                }
                let Some(next) = maze.neighbor((x, y), direction) else {
                    continue;
                };
                let (a, b) = (find(&parent, (x, y)), find(&parent, next));
                if a == b {
                    return true;
                }
                parent[a] = b;
            }
        }
    }
    false
}

#[test]
fn every_maze_is_solvable() {
    for perfect in [true, false] {
        for maze in all_mazes(perfect) {
            let path = solve_maze(&maze).unwrap();
            assert_eq!(path.start(), Some(maze.entry()));
            assert_eq!(path.end(), Some(maze.exit()));
            assert_eq!(maze.connected_cell_count(), maze.reachable_cell_count());
        }
    }
}

#[test]
fn perfect_mazes_are_spanning_trees() {
    for maze in all_mazes(true) {
        assert_eq!(maze.open_wall_count(), maze.reachable_cell_count() - 1);
        assert!(!has_cycle(&maze), "cycle in {}x{} seed {}", maze.width(), maze.height(), maze.seed);
    }
}

#[test]
fn imperfect_mazes_have_loops() {
    for seed in SEEDS {
        for generator in [Generator::Dfs, Generator::Prim] {
            let maze = generate_maze(&params(20, 15, generator, false, seed)).unwrap();
            assert!(maze.open_wall_count() > maze.reachable_cell_count() - 1);
            assert!(has_cycle(&maze));
        }
    }
}

#[test]
fn no_open_rooms() {
    for perfect in [true, false] {
        for maze in all_mazes(perfect) {
            assert!(!maze.has_open_room(), "2x2 room in {}x{} seed {}", maze.width(), maze.height(), maze.seed);
        }
    }
}

#[test]
fn overlay_cells_stay_closed() {
    for perfect in [true, false] {
        for maze in all_mazes(perfect).filter(|m| m.width() >= 9 && m.height() >= 6) {
            let blocked = maze.cells().filter(|c| c.immutable).collect::<Vec<_>>();
            assert_eq!(blocked.len(), 18);
            for cell in blocked {
                assert!(Direction::ALL.into_iter().all(|d| cell.has_wall(d)));
            }
        }
    }
}

#[test]
fn same_seed_same_maze() {
    for generator in [Generator::Dfs, Generator::Prim] {
        for perfect in [true, false] {
            let p = params(37, 11, generator, perfect, 99);
            let first = generate_maze(&p).unwrap();
            let second = generate_maze(&p).unwrap();
            assert_eq!(first.encode(), second.encode());
            assert_eq!(solve_maze(&first).unwrap(), solve_maze(&second).unwrap());
        }
    }
}

#[test]
fn encoding_round_trips() {
    for maze in all_mazes(false) {
        let encoded = maze.encode();
        assert_eq!(encoded.len(), maze.width() as usize * maze.height() as usize);
        let decoded = Maze::decode(maze.width(), maze.height(), maze.entry(), maze.exit(), &encoded).unwrap();
        assert_eq!(decoded, maze);
        assert_eq!(decoded.encode(), encoded);
    }
}

#[test]
fn small_dfs_scenario() {
    let maze = generate_maze(&params(5, 5, Generator::Dfs, true, 1)).unwrap();
    assert_eq!(maze.encode().len(), 25);
    let path = solve_maze(&maze).unwrap();
    assert!((8..=24).contains(&path.steps()));
    assert_eq!(path.to_string().len(), path.steps());
}

#[test]
fn largest_mazes() {
    for generator in [Generator::Dfs, Generator::Prim] {
        let maze = generate_maze(&params(100, 100, generator, true, 3)).unwrap();
        assert_eq!(maze.open_wall_count(), maze.reachable_cell_count() - 1);
        assert!(solve_maze(&maze).unwrap().steps() >= 198);
    }
}

#[test]
fn entry_equal_to_exit_is_rejected() {
    let p = MazeParams::new(1, 1, (0, 0), (0, 0));
    assert!(matches!(generate_maze(&p), Err(MazeError::Config(_))));
}
