use clap::{Parser, Subcommand};
use crossterm::style::{Attribute, Color as TermColor, SetBackgroundColor, Stylize};
use spinners::Spinner;
use std::{process, time::Instant};

use twophase::cubie::CubieCube;
use twophase::error::Error;
use twophase::facelet::{Color, FaceCube};
use twophase::scramble::{gen_scramble, scramble_from_str, scramble_to_str};
use twophase::solver::solve as solver;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "solves the cube using the two phase algorithm")]
    #[clap(group(
        clap::ArgGroup::new("state")
            .required(true)
            .args(&["scramble", "facelet"]),
    ))]
    Solve {
        /// scramble to solve, e.g. "R U R' U'"
        #[arg(short, long)]
        scramble: Option<String>,

        /// facelet string to solve, 54 characters U/R/F/D/L/B
        #[arg(short, long)]
        facelet: Option<String>,

        /// maximal length of the solution
        #[arg(short, long, default_value_t = 20)]
        max: usize,

        /// timeout in seconds
        #[arg(short, long, default_value_t = 3.0)]
        timeout: f64,

        /// print the scrambled cube before solving
        #[arg(short, long)]
        preview: bool,
    },

    #[command(about = "generates a random scramble")]
    Scramble {
        /// number of scramble moves
        #[arg(short, long, default_value_t = 25)]
        number: usize,

        /// print the scrambled cube
        #[arg(short, long)]
        preview: bool,
    },
}

fn solve_cmd(
    scramble: &Option<String>,
    facelet: &Option<String>,
    max: usize,
    timeout: f64,
    preview: bool,
) -> Result<(), Error> {
    let facelet_string = match scramble {
        Some(scramble) => {
            let moves = scramble_from_str(scramble)?;
            let state = CubieCube::from(&moves);
            FaceCube::try_from(&state)?.to_string()
        }
        None => facelet.clone().unwrap_or_default(),
    };

    if preview {
        let fc = FaceCube::try_from(facelet_string.as_str())?;
        print_facelet(&fc);
    }

    let start = Instant::now();
    let mut spinner = Spinner::new(spinners::Spinners::Dots, "Solving".to_owned());
    let solution = solver(&facelet_string, max, timeout);
    spinner.stop_with_newline();
    let end = Instant::now();

    let solution = solution?;
    println!("Solution: {solution}");
    println!("Move count: {}", solution.len());
    println!("Time: {:?}", end - start);
    Ok(())
}

fn scramble_cmd(number: usize, preview: bool) -> Result<(), Error> {
    let s = gen_scramble(number);
    println!("{}", scramble_to_str(&s));
    if preview {
        let cc = CubieCube::default().apply_moves(&s);
        let fc = FaceCube::try_from(&cc)?;
        print_facelet(&fc);
    }
    Ok(())
}

fn sticker(color: Color) -> String {
    let bg = match color {
        Color::U => TermColor::White,
        Color::R => TermColor::Red,
        Color::F => TermColor::Green,
        Color::D => TermColor::Yellow,
        Color::L => TermColor::Magenta,
        Color::B => TermColor::Blue,
    };
    format!(
        "{}  {}",
        SetBackgroundColor(bg),
        SetBackgroundColor(TermColor::Reset)
    )
}

/// Print the cube as a flat net, one line at a time: the U face on top, the
/// middle band L F R B, the D face below.
fn print_facelet(facelet: &FaceCube) {
    let face_row = |face: usize, row: usize| -> String {
        (0..3)
            .map(|col| sticker(facelet.f[9 * face + 3 * row + col]))
            .collect()
    };

    println!();
    for row in 0..3 {
        println!("      {}", face_row(0, row)); // U
    }
    for row in 0..3 {
        // L F R B
        println!(
            "{}{}{}{}",
            face_row(4, row),
            face_row(2, row),
            face_row(1, row),
            face_row(5, row)
        );
    }
    for row in 0..3 {
        println!("      {}", face_row(3, row)); // D
    }
    println!();
}

/// Distinct process exit code for every error kind.
fn exit_code(e: &Error) -> i32 {
    match e {
        Error::InvalidFacelet => 1,
        Error::InvalidColorCount => 2,
        Error::UnknownCorner => 3,
        Error::UnknownEdge => 4,
        Error::CornerOriSum => 5,
        Error::EdgeOriSum => 6,
        Error::ParityMismatch => 7,
        Error::Timeout => 8,
        Error::Unsolvable => 9,
        Error::CacheIo(_) | Error::CacheEncode(_) | Error::CacheDecode(_) => 10,
        Error::ClassCountMismatch { .. } => 11,
        Error::InvalidScramble => 12,
    }
}

fn main() {
    let program = Cli::parse();

    let result = match &program.command {
        Some(Commands::Solve {
            scramble,
            facelet,
            max,
            timeout,
            preview,
        }) => solve_cmd(scramble, facelet, *max, *timeout, *preview),
        Some(Commands::Scramble { number, preview }) => scramble_cmd(*number, *preview),
        None => Ok(()),
    };

    if let Err(error) = result {
        let styled = "error:".with(TermColor::Red).attribute(Attribute::Bold);
        eprintln!("{styled} {error}");
        process::exit(exit_code(&error));
    }
}
