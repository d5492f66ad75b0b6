fn main() {
    unitflip_lib::run()
}
