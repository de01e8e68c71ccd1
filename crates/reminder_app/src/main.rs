fn main() -> anyhow::Result<()> {
    reminder_app::platform::run_app(std::env::args().nth(1))
}
