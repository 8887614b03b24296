use serde::{Deserialize, Serialize};

/// Number of cells on the 3x3 board
pub const BOARD_CELLS: usize = 9;

/// Rows, columns and diagonals that win the game when filled by one player
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "player", rename_all = "snake_case")]
pub enum BoardOutcome {
    InProgress,
    Won(Player),
    Draw,
}

impl BoardOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BoardOutcome::InProgress)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Player>; BOARD_CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Option<Player>] {
        &self.cells
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// First line whose three cells hold the same mark
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        LINES.iter().copied().find(|[a, b, c]| {
            self.cells[*a].is_some()
                && self.cells[*a] == self.cells[*b]
                && self.cells[*a] == self.cells[*c]
        })
    }

    pub fn evaluate(&self) -> BoardOutcome {
        if let Some([a, _, _]) = self.winning_line() {
            if let Some(player) = self.cells[a] {
                return BoardOutcome::Won(player);
            }
        }

        if self.is_full() {
            BoardOutcome::Draw
        } else {
            BoardOutcome::InProgress
        }
    }

    fn place(&mut self, index: usize, player: Player) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) if cell.is_none() => {
                *cell = Some(player);
                true
            }
            _ => false,
        }
    }
}

/// Running tally for the page session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
}

impl Scoreboard {
    fn record(&mut self, outcome: BoardOutcome) {
        match outcome {
            BoardOutcome::Won(Player::X) => self.x_wins += 1,
            BoardOutcome::Won(Player::O) => self.o_wins += 1,
            BoardOutcome::Draw => self.draws += 1,
            BoardOutcome::InProgress => {}
        }
    }
}

/// Serializable view of the board game sent to the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub cells: Vec<Option<Player>>,
    pub next_player: Player,
    pub outcome: BoardOutcome,
    pub winning_line: Option<[usize; 3]>,
    pub status: String,
    pub scores: Scoreboard,
}

/// Two-player tic-tac-toe with a session scoreboard
#[derive(Debug, Clone)]
pub struct TicTacToe {
    board: Board,
    next_player: Player,
    outcome: BoardOutcome,
    scores: Scoreboard,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            next_player: Player::X,
            outcome: BoardOutcome::InProgress,
            scores: Scoreboard::default(),
        }
    }

    /// Place the current player's mark. Returns false (and changes nothing)
    /// when the cell is taken, out of range, or the game is already over.
    pub fn place_mark(&mut self, index: usize) -> bool {
        if self.outcome.is_terminal() {
            return false;
        }
        if !self.board.place(index, self.next_player) {
            return false;
        }

        self.outcome = self.board.evaluate();
        if self.outcome.is_terminal() {
            self.scores.record(self.outcome);
        } else {
            self.next_player = self.next_player.other();
        }
        true
    }

    pub fn reset_board(&mut self) {
        self.board = Board::new();
        self.next_player = Player::X;
        self.outcome = BoardOutcome::InProgress;
    }

    pub fn reset_scores(&mut self) {
        self.scores = Scoreboard::default();
        self.reset_board();
    }

    pub fn status_line(&self) -> String {
        match self.outcome {
            BoardOutcome::Won(player) => format!("Player {:?} wins!", player),
            BoardOutcome::Draw => "Game ended in a draw!".to_string(),
            BoardOutcome::InProgress => format!("Next player: {:?}", self.next_player),
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            cells: self.board.cells().to_vec(),
            next_player: self.next_player,
            outcome: self.outcome,
            winning_line: self.board.winning_line(),
            status: self.status_line(),
            scores: self.scores,
        }
    }
}

#[cfg(test)]
impl Board {
    /// Build a board from a cell slice, row by row. Extra cells are ignored.
    pub fn from_cells(cells: &[Option<Player>]) -> Self {
        let mut board = Self::new();
        for (slot, cell) in board.cells.iter_mut().zip(cells) {
            *slot = *cell;
        }
        board
    }

    pub fn get(&self, index: usize) -> Option<Player> {
        self.cells.get(index).copied().flatten()
    }
}

#[cfg(test)]
impl TicTacToe {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn next_player(&self) -> Player {
        self.next_player
    }

    pub fn outcome(&self) -> BoardOutcome {
        self.outcome
    }

    pub fn scores(&self) -> Scoreboard {
        self.scores
    }
}
