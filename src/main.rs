fn main() {
    xclean::cli::run();
}
