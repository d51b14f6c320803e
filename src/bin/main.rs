use std::path::Path;
use std::path::PathBuf;

use anstream::println;
use clap::Parser;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use gridpath::frontier::FrontierKind;
use gridpath::problem::GridProblem;
use gridpath::problem::GridProblemParseError;
use gridpath::render::Overlay;
use gridpath::run::Algorithm;
use gridpath::run::SearchConfig;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum AlgorithmChoice {
    Dijkstra,
    Astar,
    #[default]
    Both,
}

impl AlgorithmChoice {
    fn algorithms(&self) -> &'static [Algorithm] {
        match self {
            AlgorithmChoice::Dijkstra => &[Algorithm::Dijkstra],
            AlgorithmChoice::Astar => &[Algorithm::AStar],
            AlgorithmChoice::Both => &Algorithm::ALL,
        }
    }
}

/// Shortest paths on 4-connected grids.
///
/// Problems are text mazes (`#` walls, `S` start, `F` finish) or PNG images
/// (black walls, blue start, green finish). Without problems a random board
/// is generated.
#[derive(Parser, Debug)]
#[clap(long_version = gridpath::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg()]
    pub problems: Vec<PathBuf>,

    #[arg(short, long, env = "GRIDPATH_ALGORITHM", value_enum, default_value_t)]
    pub algorithm: AlgorithmChoice,

    #[arg(short, long, env = "GRIDPATH_FRONTIER", value_enum, default_value_t)]
    pub frontier: FrontierKind,

    /// Wall probability for the random board, in [0, 1].
    #[arg(long, default_value_t = 0.25f64, value_parser = wall_probability)]
    pub walls: f64,

    /// Seed for the random board.
    #[arg(long, default_value_t = 0u64)]
    pub seed: u64,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

fn wall_probability(s: &str) -> Result<f64, String> {
    let p: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("{p} is not a probability"))
    }
}

fn load(path: &Path) -> Result<GridProblem, GridProblemParseError> {
    let is_image = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_image {
        return GridProblem::try_from(path);
    }
    let text = std::fs::read_to_string(path).map_err(|e| GridProblemParseError::IOError {
        p: path.to_path_buf(),
        e,
    })?;
    GridProblem::try_from(text.as_str())
}

fn solve(name: &str, problem: &GridProblem, args: &Args) {
    let config = SearchConfig {
        frontier: args.frontier,
    };
    let (rows, cols) = problem.grid().dimensions();
    println!(
        "{} {}",
        name.yellow().bold(),
        format!("({rows}x{cols}, {} walls)", problem.grid().wall_count()).dimmed()
    );

    for algorithm in args.algorithm.algorithms() {
        match algorithm.run(problem, &config) {
            Ok(report) => {
                println!("{}", Overlay::new(problem, Some(report.outcome())).colored());
                println!("{report}");
                println!();
            }
            Err(e) => log::error!("{name}: {algorithm} failed. {e}"),
        }
    }
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    args.color.write_global();

    if args.problems.is_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
        let problem = GridProblem::default().randomize(&mut rng, args.walls);
        solve(&format!("random board (seed {})", args.seed), &problem, &args);
        return Ok(());
    }

    for path in &args.problems {
        match load(path) {
            Ok(problem) => solve(&path.display().to_string(), &problem, &args),
            Err(e) => log::error!("Skipping {}. {e}", path.display()),
        }
    }

    Ok(())
}
