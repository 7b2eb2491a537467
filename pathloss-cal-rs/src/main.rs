fn main() {
    pathloss_cal::cli::run();
}
