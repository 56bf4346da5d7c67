use grid_stepper::config::Config;
use grid_stepper::maze::MazeGenerator;
use grid_stepper::Pathfinder;

// Generates a maze on the grid from a config file (or the defaults) and solves it.
fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match Config::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    let mut maze = MazeGenerator::from_config(&config);
    maze.run_to_completion();
    let mut pathfinder = Pathfinder::from_config(&config);
    if let Err(e) = maze.apply(&mut pathfinder) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    let status = pathfinder.run_to_completion();
    println!("{pathfinder}");
    println!("{:?}, path of {} cells", status, pathfinder.path().len());
}
