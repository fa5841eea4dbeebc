fn main() -> Result<(), Box<dyn std::error::Error>> {
    sentiscope_lib::run()
}
