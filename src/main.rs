fn main() {
    ridge_runner::game::run();
}
