fn main() -> std::process::ExitCode {
    framelog_lib::run()
}
