use grid_stepper::scheduler::Scheduler;
use grid_stepper::tools::{Stroke, Tool};
use grid_stepper::Pathfinder;
use grid_util::point::Point;

// Draws two walls with the line and rectangle tools, then runs the search a few steps per
// "frame", printing the grid after every frame like a renderer would paint it.
fn main() {
    let mut pathfinder = Pathfinder::new(16, 8);
    let mut stroke = Stroke::begin(Tool::Line, Point::new(4, 0), &mut pathfinder);
    stroke.drag(Point::new(6, 6), &mut pathfinder);
    let mut stroke = Stroke::begin(Tool::Rectangle, Point::new(10, 2), &mut pathfinder);
    stroke.drag(Point::new(11, 7), &mut pathfinder);

    let mut scheduler = Scheduler::new(6);
    scheduler.start(&mut pathfinder);
    let mut frame = 0;
    while scheduler.is_running() {
        scheduler.tick(&mut pathfinder);
        frame += 1;
        println!("Frame {frame}: {:?}\n{pathfinder}", pathfinder.status());
    }
    println!("Path length: {}", pathfinder.path().len());
}
