fn main() {
    locker_grid::run();
}
