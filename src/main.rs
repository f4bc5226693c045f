use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use square_chess::chess_errors::ChessError;
use square_chess::session::game_session::{GameSession, GameStatus, MoveApplied};
use square_chess::utils::algebraic::algebraic_to_square;
use square_chess::utils::long_algebraic::{char_to_promotion, parse_coordinates};
use square_chess::utils::render_game_state::{render_game_state_with, RenderOptions};
use square_chess::utils::san::{move_to_san, san_to_move};

/// Play chess in the terminal by entering moves as `e2e4` or `Nf3`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Start from this FEN instead of the standard position.
    #[arg(long)]
    fen: Option<String>,

    /// Draw pieces with ASCII letters instead of Unicode glyphs.
    #[arg(long)]
    ascii: bool,

    /// Show the board from Black's side.
    #[arg(long)]
    flip: bool,
}

const HELP: &str = "commands: <move> (e2e4, e7e8q, Nf3, O-O) | moves [square] | undo | log | fen | new | help | quit";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = match &args.fen {
        Some(fen) => GameSession::from_fen(fen)?,
        None => GameSession::new_game(),
    };
    let render = RenderOptions {
        ascii: args.ascii,
        flipped: args.flip,
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    println!("{HELP}");
    print_position(&session, render);

    loop {
        print!("{} to move> ", session.side_to_move());
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        match command {
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "fen" => println!("{}", session.fen()),
            "log" => println!("{}", session.move_log_text()),
            "new" => {
                session.reset();
                print_position(&session, render);
            }
            "undo" => match session.undo() {
                Ok(()) => print_position(&session, render),
                Err(err) => println!("{err}"),
            },
            "moves" => print_moves(&session, words.next()),
            text => {
                let outcome = submit_move(&mut session, text, &mut || {
                    print!("Choose promotion (q, r, b, n): ");
                    stdout.flush().ok()?;
                    let answer = lines.next()?.ok()?;
                    answer.trim().chars().next().and_then(|ch| char_to_promotion(ch).ok())
                });
                match outcome {
                    Ok(applied) => {
                        print_position(&session, render);
                        announce(&mut session, &applied, render);
                    }
                    Err(err) => println!("{err}"),
                }
            }
        }
    }

    Ok(())
}

/// Coordinate input goes through `attempt_move_with_prompt`; anything else
/// is read as SAN.
fn submit_move(
    session: &mut GameSession,
    text: &str,
    ask_promotion: &mut dyn FnMut() -> Option<square_chess::PieceKind>,
) -> Result<MoveApplied, ChessError> {
    match parse_coordinates(text) {
        Ok((from, to, Some(promotion))) => session.attempt_move(from, to, Some(promotion)),
        Ok((from, to, None)) => session.attempt_move_with_prompt(from, to, |_, _| ask_promotion()),
        Err(_) => {
            let mv = san_to_move(session.state(), text)?;
            session.play(mv)
        }
    }
}

fn announce(session: &mut GameSession, applied: &MoveApplied, render: RenderOptions) {
    match applied.status {
        GameStatus::Check => println!("Check!"),
        GameStatus::Checkmate { winner } => {
            println!("{winner} wins by checkmate!");
            println!("{}", session.move_log_text());
            info!("game over after {} plies", session.history().len());
            session.reset();
            println!("--- New Game ---");
            print_position(session, render);
        }
        GameStatus::Stalemate => {
            println!("Stalemate: it's a draw!");
            println!("{}", session.move_log_text());
            session.reset();
            println!("--- New Game ---");
            print_position(session, render);
        }
        GameStatus::Ongoing => {}
    }

    if let Some(reason) = session.claimable_draw() {
        println!("A draw may be claimed: {reason:?}");
    }
}

fn print_moves(session: &GameSession, square: Option<&str>) {
    let moves = match square.map(algebraic_to_square) {
        Some(Ok(from)) => session.legal_moves_from(from),
        Some(Err(err)) => {
            println!("{err}");
            return;
        }
        None => session.legal_moves(),
    };

    let sans: Vec<String> = moves
        .iter()
        .filter_map(|mv| move_to_san(session.state(), mv).ok())
        .collect();
    println!("{} legal: {}", sans.len(), sans.join(" "));
}

fn print_position(session: &GameSession, render: RenderOptions) {
    println!("{}", render_game_state_with(session.state(), render));
    let log = session.move_log_text();
    if !log.is_empty() {
        println!("{log}");
    }
}
