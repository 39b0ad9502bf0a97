fn main() -> anyhow::Result<()> {
    trinketforge::cli::run_cli()
}
