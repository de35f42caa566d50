mod options;

use std::process::exit;

use itertools::Itertools;
pub use options::DTPServerOptions;

use crate::prelude::*;

/// One side of the game: an identity, the pieces it still holds, and the way
/// it picks moves. Human seats receive their moves over the protocol; engine
/// seats answer `bestmove` themselves.
pub struct Seat {
    pub player: Player,
    pub rack: Rack,
    pub decision: Decision,
}

pub struct DTPServer {
    board: Option<Board>,
    seats: [Seat; 2],
    to_move: Player,
    passes: u8,
    config: DTPServerOptions,
    seed: u64,
}

impl DTPServer {
    /// Produces a new DTP server with the given engine configuration.
    pub fn new(options: DTPServerOptions) -> Result<DTPServer> {
        let seed = options.seed.unwrap_or_else(rand::random);
        let ai = options.ai_flags()?;
        log::info!("engine seats: {}, seed {seed}", options.ai_seats);

        Ok(DTPServer {
            board: None,
            seats: Self::fresh_seats(ai, seed),
            to_move: Player::X,
            passes: 0,
            config: options,
            seed,
        })
    }

    /// Runs the engine loop until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let mut cmdstr: String = String::new();
            if std::io::stdin().read_line(&mut cmdstr)? == 0 {
                exit(0);
            }

            let args: Vec<&str> = cmdstr.split_whitespace().filter(|s| !s.is_empty()).collect();
            let cmd = *args.first().unwrap_or(&"");

            self.apply(cmd, &args[1..])?;
        }
    }

    /// Runs a command.
    fn apply(&mut self, cmd: &str, args: &[&str]) -> Result<()> {
        let result = match cmd {
            "" => Ok(()),
            "bestmove" => self.best_move(args),
            "info" => self.info(),
            "newgame" => self.new_game(args),
            "pass" => self.pass_turn(args),
            "play" => self.play_move(args),
            "quit" => exit(0),
            "racks" => self.racks(args),
            "score" => self.score(args),
            "show" => self.show(args),
            "validcheck" => self.valid_check(args),
            _ => Err(anyhow!("unrecognized command {cmd}")),
        };

        match result {
            Ok(_) => {
                log::debug!("Command completed successfully: {cmd} {}", args.join(" "));
                self.ok()
            }
            Err(err) => {
                log::warn!("encountered recoverable error:\n{err}");
                self.err(&err)
            }
        }
    }

    /// Asks the current seat for a move, applies it, and prints its notation
    /// (or `pass` when the seat has no legal placement).
    fn best_move(&mut self, _args: &[&str]) -> Result<()> {
        self.ensure_live()?;

        let player = self.to_move;
        let decided = {
            let seat = &mut self.seats[player.index()];
            let board = self.board.as_ref().unwrap();
            seat.decision.decide_move(board, &seat.rack, player)?
        };

        match decided {
            Some(mv) => {
                self.apply_placement(&mv.placement)?;
                println!("{}", mv.placement.notate());
            }
            None => {
                self.record_pass();
                println!("pass");
            }
        }
        Ok(())
    }

    /// Starts a new game, optionally with a board size and the two starting
    /// cells: `newgame [size [xr xc or oc]]`.
    fn new_game(&mut self, args: &[&str]) -> Result<()> {
        let size = match args.first() {
            Some(tok) => tok.parse::<usize>().context("board size must be an integer")?,
            None => self.config.board_size,
        };
        let starting = match args.len() {
            0 | 1 => {
                let near = size / 3;
                let far = size.saturating_sub(1 + near);
                [Coord::new(near, near), Coord::new(far, far)]
            }
            5 => {
                let cells: Vec<usize> = args[1..5]
                    .iter()
                    .map(|tok| tok.parse::<usize>())
                    .collect::<std::result::Result<_, _>>()
                    .context("starting cells must be integers")?;
                [Coord::new(cells[0], cells[1]), Coord::new(cells[2], cells[3])]
            }
            _ => return Err(anyhow!("expected `newgame [size [xr xc or oc]]`")),
        };

        self.board = Some(Board::new(size, size, starting)?);
        self.seats = Self::fresh_seats(self.config.ai_flags()?, self.seed);
        self.to_move = Player::X;
        self.passes = 0;

        println!("{}", self.get().notate());
        Ok(())
    }

    /// Plays an externally supplied move for the seat to move.
    fn play_move(&mut self, args: &[&str]) -> Result<()> {
        self.ensure_live()?;

        if args.is_empty() {
            return Err(anyhow!("no move provided"));
        }

        let MoveString { repr: _, placement } = args[0].parse::<MoveString>()?;
        match placement {
            Some(placement) => self.apply_placement(&placement)?,
            None => self.record_pass(),
        };

        println!("{}", self.get().notate());
        Ok(())
    }

    /// Passes the turn for the seat to move.
    fn pass_turn(&mut self, _args: &[&str]) -> Result<()> {
        self.ensure_live()?;

        self.record_pass();
        println!("{}", self.get().notate());
        Ok(())
    }

    /// Prints the remaining pieces each seat holds.
    fn racks(&mut self, _args: &[&str]) -> Result<()> {
        self.ensure_started()?;

        for seat in &self.seats {
            let held = seat
                .rack
                .available_pieces()
                .iter()
                .map(|piece| format!("P{:02}", piece.id()))
                .join(" ");
            println!("{} {}", seat.player.notate(), held);
        }
        Ok(())
    }

    /// Prints both seats' scores: the cell count of each unplaced inventory,
    /// so lower is better.
    fn score(&mut self, _args: &[&str]) -> Result<()> {
        self.ensure_started()?;

        println!(
            "X {} O {}",
            self.seats[Player::X.index()].rack.score(),
            self.seats[Player::O.index()].rack.score()
        );
        Ok(())
    }

    /// Prints the board grid and whose turn it is.
    fn show(&mut self, _args: &[&str]) -> Result<()> {
        self.ensure_started()?;

        println!("{}", self.get().pretty());
        if self.game_over() {
            println!("game over");
        } else {
            println!("{} to move", self.to_move.notate());
        }
        Ok(())
    }

    /// Reports whether a move string would be legal for the seat to move,
    /// without playing it.
    fn valid_check(&mut self, args: &[&str]) -> Result<()> {
        self.ensure_started()?;

        if args.is_empty() {
            return Err(anyhow!("no move provided"));
        }

        let MoveString { repr: _, placement } = args[0].parse::<MoveString>()?;
        let valid = match placement {
            None => !self.game_over(),
            Some(placement) => {
                let seat = &self.seats[self.to_move.index()];
                !self.game_over()
                    && seat.rack.piece(placement.piece_id).is_some_and(|piece| {
                        let oriented = piece.oriented(placement.rotations, placement.flipped);
                        self.get().is_valid_placement(&oriented, &placement.anchor, self.to_move)
                    })
            }
        };

        println!("{}", if valid { "valid" } else { "invalid" });
        Ok(())
    }

    // game-state transitions

    /// Validates and applies a placement for the seat to move, spending the
    /// piece and handing the turn over. All-or-nothing on failure.
    fn apply_placement(&mut self, placement: &Placement) -> Result<()> {
        let player = self.to_move;
        let seat = &mut self.seats[player.index()];
        let board = self.board.as_mut().ok_or_else(|| anyhow!("no game in progress"))?;

        let piece = seat
            .rack
            .piece(placement.piece_id)
            .ok_or_else(|| anyhow!("piece P{:02} is no longer available", placement.piece_id))?;
        let oriented = piece.oriented(placement.rotations, placement.flipped);
        if !board.place_piece(&oriented, &placement.anchor, player) {
            return Err(anyhow!("illegal placement {}", placement.notate()));
        }

        seat.rack.take(placement.piece_id);
        self.passes = 0;
        self.to_move = -player;
        Ok(())
    }

    /// Hands the turn over without a placement.
    fn record_pass(&mut self) {
        self.passes += 1;
        self.to_move = -self.to_move;
        if self.game_over() {
            log::info!("both seats passed; the game is over");
        }
    }

    /// The game ends after two consecutive passes.
    fn game_over(&self) -> bool {
        self.passes >= 2
    }

    // accessors

    fn ensure_started(&mut self) -> Result<&mut Board> {
        if self.board.is_none() {
            Err(anyhow!("no game in progress"))
        } else {
            Ok(self.get_mut())
        }
    }

    fn ensure_live(&mut self) -> Result<&mut Board> {
        if self.game_over() {
            return Err(anyhow!("the game is over; start another with newgame"));
        }
        self.ensure_started()
    }

    /// Retrieves the board in a shared context.
    fn get(&self) -> &Board {
        self.board.as_ref().unwrap()
    }

    /// Retrieves the board in a mutable context.
    fn get_mut(&mut self) -> &mut Board {
        self.board.as_mut().unwrap()
    }

    fn fresh_seats(ai: [bool; 2], seed: u64) -> [Seat; 2] {
        Player::all().map(|player| {
            let decision = if ai[player.index()] {
                Decision::Heuristic(HeuristicAgent::new(seed.wrapping_add(player.index() as u64)))
            } else {
                Decision::Human
            };
            Seat { player, rack: Rack::new(), decision }
        })
    }

    // basic printers

    /// Prints the server's ID.
    fn info(&self) -> Result<()> {
        println!("id {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        Ok(())
    }

    /// Prints an error to the DTP stream.
    fn err(&self, err: &Error) -> Result<()> {
        println!("err\n{}", err);
        self.ok()
    }

    /// Prints the ok footer to the DTP stream.
    fn ok(&self) -> Result<()> {
        println!("ok");
        Ok(())
    }
}
