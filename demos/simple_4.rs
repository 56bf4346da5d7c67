use grid_stepper::Pathfinder;

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  G|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - G marks the end
//
// Nodes have a 4-neighborhood

fn main() {
    let mut pathfinder = Pathfinder::new(3, 3);
    pathfinder.set_wall(1, 1, true);
    println!("{}", pathfinder);
    let status = pathfinder.run_to_completion();
    println!("{:?}\n{}", status, pathfinder);
    println!("Path:");
    for p in pathfinder.path() {
        println!("{:?}", p);
    }
}
