fn main() -> std::process::ExitCode {
    gesture_console::run()
}
