use std::{
    collections::HashSet,
    error,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info, trace, warn};

#[derive(Debug)]
pub enum Error {
    InconsistentRow(usize, usize, usize),
    InvalidChar(char, Position),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InconsistentRow(row_ind, expect_col_n, real_col_n) => write!(
                f,
                "Expect {} columns in row {}, given {}.",
                expect_col_n, row_ind, real_col_n
            ),
            Error::InvalidChar(c, pos) => write!(
                f,
                "Invalid character({}) at {} in text of laboratory layout.",
                c, pos
            ),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    #[arg(default_value = "input/day6/input.txt")]
    pub input_path: PathBuf,
    /// What happens when the guard walks into the edge of the laboratory
    #[arg(long, value_enum, default_value_t = EdgePolicy::Exit)]
    pub edge: EdgePolicy,
    /// Check candidate obstruction positions on all cores
    #[arg(long)]
    pub parallel: bool,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CLIArgs {
    pub fn patrol_options(&self) -> PatrolOptions {
        PatrolOptions {
            edge: self.edge,
            parallel: self.parallel,
        }
    }

    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(level)
            .init();
    }
}

/// Behavior of the guard at the boundary of the laboratory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum EdgePolicy {
    /// The guard walks out and the patrol is over.
    #[default]
    Exit,
    /// The boundary blocks the guard like an obstruction.
    Wall,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PatrolOptions {
    pub edge: EdgePolicy,
    pub parallel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "^"),
            Direction::Right => write!(f, ">"),
            Direction::Down => write!(f, "v"),
            Direction::Left => write!(f, "<"),
        }
    }
}

impl Direction {
    pub fn turn_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    r: usize,
    c: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

impl Position {
    pub fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }

    pub fn r(&self) -> usize {
        self.r
    }

    pub fn c(&self) -> usize {
        self.c
    }

    // None only when stepping over the top or left edge, the caller checks the other two.
    pub fn along(&self, dir: Direction) -> Option<Position> {
        match dir {
            Direction::Up if self.r > 0 => Some(Self::new(self.r - 1, self.c)),
            Direction::Right => Some(Self::new(self.r, self.c + 1)),
            Direction::Down => Some(Self::new(self.r + 1, self.c)),
            Direction::Left if self.c > 0 => Some(Self::new(self.r, self.c - 1)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guard {
    pos: Position,
    dir: Direction,
}

impl Display for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.dir, self.pos())
    }
}

impl Guard {
    pub fn new(pos: &Position, dir: Direction) -> Self {
        Self { pos: *pos, dir }
    }

    pub fn pos(&self) -> &Position {
        &self.pos
    }

    pub fn dir(&self) -> Direction {
        self.dir
    }

    pub fn ahead_pos(&self) -> Option<Position> {
        self.pos.along(self.dir)
    }

    pub fn turn_right(&mut self) {
        self.dir = self.dir.turn_right();
    }
}

/// How a simulated patrol came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolEnd {
    /// Walked out of the laboratory.
    Left,
    /// Turned at the same position in the same direction twice.
    Looped,
    /// Ran through the whole step budget without either of the above.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ahead {
    Open(Position),
    Blocked,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Empty,
    Obstacle,
}

#[derive(Debug)]
pub struct Laboratory {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: usize,
    guard: Option<Guard>,
}

impl TryFrom<&str> for Laboratory {
    type Error = Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        let mut builder = LaboratoryBuilder::new();
        for line in value.lines() {
            builder.add_row(line)?;
        }

        Ok(builder.build())
    }
}

impl Laboratory {
    pub fn row_n(&self) -> usize {
        self.row_n
    }

    pub fn col_n(&self) -> usize {
        self.col_n
    }

    pub fn guard(&self) -> Option<&Guard> {
        self.guard.as_ref()
    }

    pub fn is_obstacle(&self, pos: &Position) -> bool {
        self.tile(pos).is_some_and(|tile| *tile == Tile::Obstacle)
    }

    /// Every cell where an extra obstruction could be placed: not an
    /// obstacle already and not where the guard stands. Row-major order.
    pub fn candidate_positions(&self) -> impl Iterator<Item = Position> + '_ {
        let start = self.guard.as_ref().map(|guard| *guard.pos());
        (0..self.row_n)
            .flat_map(move |r| (0..self.col_n).map(move |c| Position::new(r, c)))
            .filter(move |pos| !self.is_obstacle(pos) && Some(*pos) != start)
    }

    /// Counts the candidate positions which trap the guard in a loop once
    /// an obstruction is put there.
    pub fn loop_positions_n(&self, options: &PatrolOptions) -> usize {
        if self.guard.is_none() {
            warn!("No guard in given laboratory, so no position can make it loop.");
            return 0;
        }

        let candidates = self.candidate_positions().collect::<Vec<_>>();
        debug!(
            candidates = candidates.len(),
            edge = ?options.edge,
            parallel = options.parallel,
            "Checking candidate obstruction positions."
        );
        let is_loop = |pos: &Position| {
            let looped = self.is_loop_with(Some(pos), options.edge);
            trace!(%pos, looped, "Checked obstruction.");
            looped
        };
        let loop_n = if options.parallel {
            candidates.par_iter().filter(|pos| is_loop(*pos)).count()
        } else {
            candidates.iter().filter(|pos| is_loop(*pos)).count()
        };
        info!(loop_n, "Found obstruction positions making the guard loop.");

        loop_n
    }

    pub fn is_loop_with(&self, extra: Option<&Position>, edge: EdgePolicy) -> bool {
        self.patrol(extra, edge, |_| ()) == PatrolEnd::Looped
    }

    /// Distinct positions the guard stands on until the patrol ends,
    /// starting position included.
    pub fn patrol_positions(&self, edge: EdgePolicy) -> HashSet<Position> {
        let mut positions = HashSet::new();
        let end = self.patrol(None, edge, |pos| {
            positions.insert(*pos);
        });
        debug!(?end, visited = positions.len(), "Patrol finished.");

        positions
    }

    /// Walks the guard from its starting state, calling `on_visit` with every
    /// position it stands on (repeats included).
    pub fn patrol<F>(
        &self,
        extra: Option<&Position>,
        edge: EdgePolicy,
        mut on_visit: F,
    ) -> PatrolEnd
    where
        F: FnMut(&Position),
    {
        let Some(mut cur_guard) = self.guard.clone() else {
            return PatrolEnd::Left;
        };

        on_visit(cur_guard.pos());
        let mut turned = HashSet::new();
        let step_limit = self.row_n * self.col_n * 4;
        for _ in 0..step_limit {
            match (self.ahead(&cur_guard, extra), edge) {
                (Ahead::Open(next_pos), _) => {
                    cur_guard.pos = next_pos;
                    on_visit(cur_guard.pos());
                }
                (Ahead::Outside, EdgePolicy::Exit) => return PatrolEnd::Left,
                (Ahead::Blocked, _) | (Ahead::Outside, EdgePolicy::Wall) => {
                    if !turned.insert(cur_guard.clone()) {
                        return PatrolEnd::Looped;
                    }

                    cur_guard.turn_right();
                }
            }
        }

        PatrolEnd::Exhausted
    }

    fn ahead(&self, guard: &Guard, extra: Option<&Position>) -> Ahead {
        match guard.ahead_pos() {
            Some(pos) if self.is_inside(&pos) => {
                if self.is_obstacle(&pos) || extra == Some(&pos) {
                    Ahead::Blocked
                } else {
                    Ahead::Open(pos)
                }
            }
            _ => Ahead::Outside,
        }
    }

    fn is_inside(&self, pos: &Position) -> bool {
        pos.r < self.row_n && pos.c < self.col_n
    }

    fn tile(&self, pos: &Position) -> Option<&Tile> {
        if self.is_inside(pos) {
            self.tiles.get(pos.r * self.col_n + pos.c)
        } else {
            None
        }
    }
}

struct LaboratoryBuilder {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: Option<usize>,
    guard: Option<Guard>,
}

impl LaboratoryBuilder {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            row_n: 0,
            col_n: None,
            guard: None,
        }
    }

    pub fn add_row(&mut self, row_text: &str) -> Result<(), Error> {
        let row_text = row_text.trim_end();
        if row_text.is_empty() {
            return Ok(());
        }

        let this_col_n = row_text.chars().count();
        let expect_col_n = *self.col_n.get_or_insert(this_col_n);
        if expect_col_n != this_col_n {
            return Err(Error::InconsistentRow(self.row_n, expect_col_n, this_col_n));
        }

        for (ind, c) in row_text.chars().enumerate() {
            let pos = Position::new(self.row_n, ind);
            match c {
                '.' => self.tiles.push(Tile::Empty),
                '#' => self.tiles.push(Tile::Obstacle),
                '^' => {
                    if let Some(guard) = &self.guard {
                        warn!(first = %guard, ignored = %pos, "Found another guard, only the first one patrols.");
                    } else {
                        self.guard = Some(Guard::new(&pos, Direction::Up));
                    }
                    self.tiles.push(Tile::Empty);
                }
                other => return Err(Error::InvalidChar(other, pos)),
            }
        }
        self.row_n += 1;

        Ok(())
    }

    pub fn build(self) -> Laboratory {
        let lab = Laboratory {
            tiles: self.tiles,
            row_n: self.row_n,
            col_n: self.col_n.unwrap_or(0),
            guard: self.guard,
        };
        debug!(
            row_n = lab.row_n,
            col_n = lab.col_n,
            guard = ?lab.guard,
            "Built laboratory."
        );

        lab
    }
}

pub fn read_lab<P: AsRef<Path>>(path: P) -> Result<Laboratory> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open given file({}).", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let mut builder = LaboratoryBuilder::new();
    for (ind, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!(
                "Failed to read line {} from given file({}).",
                ind + 1,
                path.as_ref().display()
            )
        })?;
        builder.add_row(line.as_str())?;
    }

    Ok(builder.build())
}
