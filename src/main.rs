fn main() {
    declassify::cli::run();
}
